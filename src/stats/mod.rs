//! Stats module - grouped means, descriptive statistics, correlation

mod aggregator;
mod correlation;
mod descriptive;

pub use aggregator::{AggregateRow, AggregateTable, Aggregator};
pub use correlation::{correlation_matrix, correlation_p_value, pearson, CorrelationMatrix};
pub use descriptive::{describe, percentile, ColumnSummary};

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("missing column '{0}'")]
    MissingColumn(String),
}
