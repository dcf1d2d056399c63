//! Correlation Module
//! Pairwise Pearson correlation with two-tailed significance.

use crate::stats::aggregator::Aggregator;
use crate::stats::StatsError;
use polars::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Significance threshold for the correlation t-test
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Square matrix of pairwise correlations over a set of columns.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major `columns.len()` x `columns.len()` coefficients.
    pub r: Vec<f64>,
    /// Two-tailed p-values, same layout as `r`.
    pub p_values: Vec<f64>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.r[row * self.size() + col]
    }

    pub fn p_value(&self, row: usize, col: usize) -> f64 {
        self.p_values[row * self.size() + col]
    }

    pub fn is_significant(&self, row: usize, col: usize) -> bool {
        row != col && self.p_value(row, col) <= SIGNIFICANCE_THRESHOLD
    }
}

/// Pearson correlation of two equally long samples. NaN if either has no variance.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }
    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x[..n].iter().zip(&y[..n]) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Two-tailed p-value of H0: rho = 0 for a sample correlation `r` over `n` pairs.
pub fn correlation_p_value(r: f64, n: usize) -> f64 {
    if r.is_nan() || n < 3 {
        return f64::NAN;
    }
    if r.abs() >= 1.0 {
        return 0.0;
    }

    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();

    // Two-tailed p-value using t-distribution
    if let Ok(dist) = StudentsT::new(0.0, 1.0, df) {
        2.0 * (1.0 - dist.cdf(t.abs()))
    } else {
        f64::NAN
    }
}

/// Correlation matrix over `columns`, using only rows complete in every column.
pub fn correlation_matrix(df: &DataFrame, columns: &[&str]) -> Result<CorrelationMatrix, StatsError> {
    let raw: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|c| Aggregator::float_values(df, c))
        .collect::<Result<_, _>>()?;

    let complete: Vec<usize> = (0..df.height())
        .filter(|&i| raw.iter().all(|col| col[i].is_some_and(|v| !v.is_nan())))
        .collect();
    let data: Vec<Vec<f64>> = raw
        .iter()
        .map(|col| complete.iter().filter_map(|&i| col[i]).collect())
        .collect();

    let k = columns.len();
    let mut r = vec![f64::NAN; k * k];
    let mut p_values = vec![f64::NAN; k * k];
    for i in 0..k {
        for j in i..k {
            let coefficient = if i == j { 1.0 } else { pearson(&data[i], &data[j]) };
            let p = if i == j { 0.0 } else { correlation_p_value(coefficient, complete.len()) };
            r[i * k + j] = coefficient;
            r[j * k + i] = coefficient;
            p_values[i * k + j] = p;
            p_values[j * k + i] = p;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        r,
        p_values,
    })
}
