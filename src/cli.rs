//! Command-line interface

use crate::config::{Config, DEFAULT_DPI};
use crate::data::{CategoryPolicy, DEFAULT_INPUT};
use crate::model::{SplitConfig, DEFAULT_SEED, DEFAULT_TEST_FRACTION};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

/// Output format for the run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable lines (default)
    Text,
    /// One JSON document on stdout
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "score-insight")]
#[command(version)]
#[command(about = "Exploratory analysis of student exam scores with static charts", long_about = None)]
pub struct Cli {
    /// Input CSV file
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Directory the PNG charts are written to
    #[arg(short, long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Chart resolution in dots per inch
    #[arg(long, value_name = "N", default_value_t = DEFAULT_DPI)]
    pub dpi: u32,

    /// Seed for the train/test shuffle
    #[arg(long, value_name = "N", default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Fraction of rows held out for evaluation
    #[arg(long = "test-size", value_name = "F", default_value_t = DEFAULT_TEST_FRACTION)]
    pub test_size: f64,

    /// Encode unknown category values as missing instead of failing
    #[arg(long = "lenient-categories")]
    pub lenient_categories: bool,

    /// Also write a correlation heatmap of scores and binary attributes
    #[arg(long)]
    pub correlation: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn into_config(self) -> Config {
        Config {
            input: self.input,
            output_dir: self.output_dir,
            dpi: self.dpi,
            split: SplitConfig {
                test_fraction: self.test_size,
                seed: self.seed,
            },
            policy: if self.lenient_categories {
                CategoryPolicy::Lenient
            } else {
                CategoryPolicy::Strict
            },
            correlation: self.correlation,
            format: self.format,
        }
    }
}
