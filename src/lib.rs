pub mod config;
pub mod constants;
pub mod error;
#[cfg(test)]
pub mod test;
pub mod windowing;
pub mod util {
    pub mod column_utils;
    pub mod diagnostics;
    pub mod inspection;
    pub mod pre_processor;
    #[cfg(test)]
    pub mod test_utils;
}

pub use config::{DegeneratePolicy, PipelineConfig, SplitConfig, WindowConfig};
pub use error::{ConfigError, PrepError, PrepResult};
pub use util::diagnostics::{Diagnostic, Diagnostics, Severity};
