// External crates
use polars::error::PolarsError;
use thiserror::Error;

/// Invalid configuration values, reported before any transformation runs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("split ratio must lie strictly between 0 and 1, got {0}")]
    InvalidRatio(f64),
    #[error("observation window length must be greater than zero")]
    ZeroObservations,
    #[error("target window length must be greater than zero")]
    ZeroTargets,
    #[error("observation, offset and target lengths overflow when added")]
    WindowTooLarge,
    #[error("batch size must be greater than zero")]
    ZeroBatchSize,
}

/// Errors raised while preparing windows and batches
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("column `{0}` not found")]
    MissingColumn(String),
    #[error("column `{column}` has no usable variance in the training partition (std = {std})")]
    DegenerateColumn { column: String, std: f64 },
    #[error("column `{column}` has dtype {dtype} and cannot be used as a numeric feature")]
    NonNumericColumn { column: String, dtype: String },
    #[error("column `{column}` contains {count} missing values")]
    MissingValues { column: String, count: usize },
    #[error("cannot parse `{value}` in column `{column}` as a timestamp")]
    InvalidTimestamp { column: String, value: String },
    #[error(transparent)]
    Polars(#[from] PolarsError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type PrepResult<T> = Result<T, PrepError>;
