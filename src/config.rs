//! Run configuration
//! Everything a pipeline run needs, resolved before any data is read.

use crate::cli::OutputFormat;
use crate::data::{CategoryPolicy, DEFAULT_INPUT};
use crate::model::SplitConfig;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_DPI: u32 = 300;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("test size must lie strictly between 0 and 1, got {0}")]
    TestSize(f64),
    #[error("dpi must be positive")]
    Dpi,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub dpi: u32,
    pub split: SplitConfig,
    pub policy: CategoryPolicy,
    /// Also write the correlation heatmap.
    pub correlation: bool,
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from("."),
            dpi: DEFAULT_DPI,
            split: SplitConfig::default(),
            policy: CategoryPolicy::default(),
            correlation: false,
            format: OutputFormat::Text,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fraction = self.split.test_fraction;
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(ConfigError::TestSize(fraction));
        }
        if self.dpi == 0 {
            return Err(ConfigError::Dpi);
        }
        Ok(())
    }
}
