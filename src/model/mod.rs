//! Model module - seeded split and linear least-squares fit

mod regression;
mod split;

pub use regression::{FeatureWeight, FittedModel, ModelFit};
pub use split::{split_indices, Partition, SplitConfig, DEFAULT_SEED, DEFAULT_TEST_FRACTION};

use crate::stats::StatsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("target column '{0}' not found")]
    MissingTarget(String),
    #[error("not enough complete rows to fit: {rows} rows, need at least {required} for training")]
    InsufficientRows { rows: usize, required: usize },
    #[error("model fit failed: {0}")]
    Fit(String),
    #[error(transparent)]
    Stats(#[from] StatsError),
}
