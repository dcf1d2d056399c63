//! Grouped Aggregation Module
//! Mean scores per ordinal category, in declared rank order.

use crate::data::DataProcessor;
use crate::stats::StatsError;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// One category of an aggregate table.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateRow {
    pub category: String,
    pub count: usize,
    /// Means aligned with `AggregateTable::value_columns`; NaN when `count == 0`.
    pub means: Vec<f64>,
}

/// Grouped means keyed by an ordinal category.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateTable {
    pub key_column: String,
    pub value_columns: Vec<String>,
    pub rows: Vec<AggregateRow>,
}

impl AggregateTable {
    /// Categories in output order.
    pub fn categories(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.category.as_str()).collect()
    }

    /// Means of one value column across categories, in output order.
    pub fn series(&self, value_column: &str) -> Option<Vec<f64>> {
        let idx = self.value_columns.iter().position(|c| c == value_column)?;
        Some(self.rows.iter().map(|r| r.means[idx]).collect())
    }
}

/// Computes grouped summary statistics.
pub struct Aggregator;

impl Aggregator {
    /// Arithmetic mean of each value column per category of `key_column`.
    ///
    /// Grouping is exhaustive: every entry of `order` appears once, in that order,
    /// and categories without rows carry NaN means. Rows whose key is missing or not
    /// listed in `order` are left out of every group.
    pub fn group_means(
        df: &DataFrame,
        key_column: &str,
        order: &[&str],
        value_columns: &[&str],
    ) -> Result<AggregateTable, StatsError> {
        let keys = DataProcessor::string_values(df, key_column)
            .map_err(|_| StatsError::MissingColumn(key_column.to_string()))?;

        let slot: HashMap<&str, usize> = order.iter().enumerate().map(|(i, k)| (*k, i)).collect();
        let assignment: Vec<Option<usize>> = keys
            .iter()
            .map(|k| k.as_deref().and_then(|k| slot.get(k).copied()))
            .collect();

        let unassigned = assignment.iter().filter(|a| a.is_none()).count();
        if unassigned > 0 {
            debug!(key_column, unassigned, "rows outside the declared categories");
        }

        let mut counts = vec![0usize; order.len()];
        for idx in assignment.iter().flatten() {
            counts[*idx] += 1;
        }

        // Each value column is reduced independently.
        let per_column: Vec<Vec<f64>> = value_columns
            .par_iter()
            .map(|name| Self::column_means(df, name, &assignment, order.len()))
            .collect::<Result<_, _>>()?;

        let rows = order
            .iter()
            .enumerate()
            .map(|(i, category)| AggregateRow {
                category: category.to_string(),
                count: counts[i],
                means: per_column.iter().map(|means| means[i]).collect(),
            })
            .collect();

        info!(key_column, groups = order.len(), "computed grouped means");
        Ok(AggregateTable {
            key_column: key_column.to_string(),
            value_columns: value_columns.iter().map(|c| c.to_string()).collect(),
            rows,
        })
    }

    fn column_means(
        df: &DataFrame,
        name: &str,
        assignment: &[Option<usize>],
        groups: usize,
    ) -> Result<Vec<f64>, StatsError> {
        let values = Self::float_values(df, name)?;

        let mut sums = vec![0.0f64; groups];
        let mut counts = vec![0usize; groups];
        for (value, group) in values.iter().zip(assignment) {
            if let (Some(v), Some(g)) = (value, group) {
                if !v.is_nan() {
                    sums[*g] += v;
                    counts[*g] += 1;
                }
            }
        }

        Ok(sums
            .into_iter()
            .zip(counts)
            .map(|(sum, n)| if n == 0 { f64::NAN } else { sum / n as f64 })
            .collect())
    }

    /// Read a numeric column as optional `f64` values.
    pub fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, StatsError> {
        let column = df
            .column(name)
            .map_err(|_| StatsError::MissingColumn(name.to_string()))?;
        let value_f64 = column.cast(&DataType::Float64)?;
        let value_ca = value_f64.f64()?;
        Ok(value_ca.into_iter().collect())
    }
}
