// External crates
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// Internal modules
use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_NORMALIZE, DEFAULT_OBSERVATIONS, DEFAULT_OFFSET,
    DEFAULT_SPLIT_RATIO, DEFAULT_TARGETS,
};
use crate::error::{ConfigError, PrepResult};

/// What to do with a column whose training standard deviation is zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Abort the split with `PrepError::DegenerateColumn`
    #[default]
    Fail,
    /// Leave the column unnormalized in both partitions and warn
    PassThrough,
}

/// Train/test split settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Fraction of rows assigned to training, strictly between 0 and 1
    pub ratio: f64,
    /// Standardize features with statistics fitted on the training rows
    pub normalize: bool,
    #[serde(default)]
    pub degenerate_policy: DegeneratePolicy,
}

impl SplitConfig {
    pub fn new(ratio: f64, normalize: bool) -> Self {
        Self {
            ratio,
            normalize,
            degenerate_policy: DegeneratePolicy::default(),
        }
    }

    pub fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate_policy = policy;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ratio > 0.0 && self.ratio < 1.0) {
            return Err(ConfigError::InvalidRatio(self.ratio));
        }
        Ok(())
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SPLIT_RATIO, DEFAULT_NORMALIZE)
    }
}

/// Block layout of one sequence: `observations`, then `offset` skipped rows, then `targets`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub observations: usize,
    pub offset: usize,
    pub targets: usize,
}

impl WindowConfig {
    pub fn new(observations: usize, offset: usize, targets: usize) -> Self {
        Self {
            observations,
            offset,
            targets,
        }
    }

    /// Number of rows consumed by one sequence, `None` on overflow
    pub fn block_len(&self) -> Option<usize> {
        self.observations
            .checked_add(self.offset)?
            .checked_add(self.targets)
    }

    /// Validates the lengths and returns the block length
    pub fn validated_block_len(&self) -> Result<usize, ConfigError> {
        if self.observations == 0 {
            return Err(ConfigError::ZeroObservations);
        }
        if self.targets == 0 {
            return Err(ConfigError::ZeroTargets);
        }
        self.block_len().ok_or(ConfigError::WindowTooLarge)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validated_block_len().map(|_| ())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OBSERVATIONS, DEFAULT_OFFSET, DEFAULT_TARGETS)
    }
}

/// Full configuration of one preparation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub split: SplitConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            split: SplitConfig::default(),
            window: WindowConfig::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl PipelineConfig {
    /// Checks every setting, failing on the first invalid one
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.split.validate()?;
        self.window.validate()?;
        validate_batch_size(self.batch_size)
    }

    /// Load a configuration from a JSON file. Missing sections take their defaults.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSON file
    ///
    /// # Returns
    ///
    /// The validated configuration
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PrepResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> PrepResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn validate_batch_size(batch_size: usize) -> Result<(), ConfigError> {
    if batch_size == 0 {
        return Err(ConfigError::ZeroBatchSize);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_ratio_bounds_are_exclusive() {
        for ratio in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            let err = SplitConfig::new(ratio, true).validate().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidRatio(_)));
        }
        assert!(SplitConfig::new(0.01, false).validate().is_ok());
        assert!(SplitConfig::new(0.99, false).validate().is_ok());
    }

    #[test]
    fn test_window_lengths_must_be_positive() {
        assert_eq!(
            WindowConfig::new(0, 1, 1).validate(),
            Err(ConfigError::ZeroObservations)
        );
        assert_eq!(
            WindowConfig::new(3, 1, 0).validate(),
            Err(ConfigError::ZeroTargets)
        );
        // A zero gap is allowed
        assert!(WindowConfig::new(3, 0, 1).validate().is_ok());
        assert_eq!(WindowConfig::new(5, 1, 1).block_len(), Some(7));
    }

    #[test]
    fn test_window_too_large_from_json() {
        let json = format!(
            r#"{{"window": {{"observations": {}, "offset": 1, "targets": 1}}}}"#,
            usize::MAX
        );
        let config: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(
            config.window.validate(),
            Err(ConfigError::WindowTooLarge)
        );
        assert!(config.validate().is_err());
        assert_eq!(WindowConfig::new(usize::MAX, 0, 1).block_len(), None);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let config = PipelineConfig {
            batch_size: 0,
            ..PipelineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroBatchSize));
    }

    #[test]
    fn test_load_partial_json_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"split": {{"ratio": 0.7, "normalize": false, "degenerate_policy": "pass_through"}},
                "window": {{"observations": 5, "offset": 1, "targets": 1}}}}"#
        )
        .unwrap();

        let config = PipelineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.split.ratio, 0.7);
        assert!(!config.split.normalize);
        assert_eq!(config.split.degenerate_policy, DegeneratePolicy::PassThrough);
        assert_eq!(config.window, WindowConfig::new(5, 1, 1));
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_invalid_json_config_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"batch_size": 0}}"#).unwrap();
        assert!(PipelineConfig::from_json_file(file.path()).is_err());
    }
}
