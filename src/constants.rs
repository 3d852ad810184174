// Column naming
pub const DATETIME_COLUMN: &str = "datetime";

// Splitting
pub const DEFAULT_SPLIT_RATIO: f64 = 0.8; // 80% of rows go to training
pub const DEFAULT_NORMALIZE: bool = true;

// Standard deviations below this are treated as zero variance
pub const STD_EPSILON: f64 = 1e-10;

// Windowing (hourly data: one day of observations, next hour as target)
pub const DEFAULT_OBSERVATIONS: usize = 24;
pub const DEFAULT_OFFSET: usize = 0;
pub const DEFAULT_TARGETS: usize = 1;

// Batching
pub const DEFAULT_BATCH_SIZE: usize = 32;

// Diagnostic stage tags, also used as `log` targets
pub const STAGE_SPLIT: &str = "gridcast_prep::split";
pub const STAGE_SEQUENCES: &str = "gridcast_prep::sequences";
pub const STAGE_PIPELINE: &str = "gridcast_prep::pipeline";
pub const STAGE_PRE_PROCESSOR: &str = "gridcast_prep::pre_processor";
