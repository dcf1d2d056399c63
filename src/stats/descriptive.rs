//! Descriptive Statistics
//! Count, central tendency, spread and tail percentiles of a score column.

use serde::Serialize;
use statrs::statistics::Statistics;

/// Summary of one numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub p05: f64,
    pub p95: f64,
}

impl Default for ColumnSummary {
    fn default() -> Self {
        Self {
            column: String::new(),
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            p05: f64::NAN,
            p95: f64::NAN,
        }
    }
}

/// Summarize one column. Moments come from statrs; the median and tails use
/// linear-interpolation percentiles over the sorted values.
pub fn describe(column: &str, values: &[f64]) -> ColumnSummary {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return ColumnSummary {
            column: column.to_string(),
            ..Default::default()
        };
    };

    // statrs reports NaN for the sample deviation of a single value.
    let std = if sorted.len() > 1 {
        Statistics::std_dev(values)
    } else {
        0.0
    };

    ColumnSummary {
        column: column.to_string(),
        count: sorted.len(),
        mean: Statistics::mean(values),
        median: percentile(&sorted, 50.0),
        std,
        min,
        max,
        p05: percentile(&sorted, 5.0),
        p95: percentile(&sorted, 95.0),
    }
}

/// `p`-th percentile of ascending values, interpolating between the two closest
/// ranks (NumPy's default `linear` method). NaN for an empty slice.
pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    let Some(last) = sorted_values.len().checked_sub(1) else {
        return f64::NAN;
    };
    let rank = (p / 100.0).clamp(0.0, 1.0) * last as f64;
    let below = rank.floor() as usize;
    let above = (below + 1).min(last);
    let weight = rank - below as f64;
    sorted_values[below] + (sorted_values[above] - sorted_values[below]) * weight
}
