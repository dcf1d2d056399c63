//! Linear Model Fit
//! Seeded 80/20 split, least-squares fit, held-out MSE and per-feature weights.

use crate::model::split::{split_indices, Partition, SplitConfig};
use crate::model::ModelError;
use crate::stats::Aggregator;
use aprender::linear_model::LinearRegression;
use aprender::metrics::mse;
use aprender::primitives::{Matrix, Vector};
use aprender::traits::Estimator;
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Relative residual norm below which a column counts as a combination of earlier ones.
const COLLINEARITY_TOLERANCE: f64 = 1e-8;

/// Weight learned for one feature column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureWeight {
    pub feature: String,
    pub weight: f64,
}

/// Result of one fit. Lives for the duration of the run only.
#[derive(Debug, Clone)]
pub struct FittedModel {
    pub target: String,
    pub features: Vec<String>,
    pub weights: Vec<f64>,
    pub intercept: f64,
    /// Table row indices of the training and held-out rows.
    pub partition: Partition,
    /// Mean squared error on the held-out rows.
    pub mse: f64,
}

impl FittedModel {
    pub fn feature_weights(&self) -> Vec<FeatureWeight> {
        self.features
            .iter()
            .zip(&self.weights)
            .map(|(feature, &weight)| FeatureWeight {
                feature: feature.clone(),
                weight,
            })
            .collect()
    }
}

/// Fits a linear model predicting `target` from every other column.
pub struct ModelFit {
    target: String,
    split: SplitConfig,
}

impl ModelFit {
    pub fn new(target: impl Into<String>, split: SplitConfig) -> Self {
        Self {
            target: target.into(),
            split,
        }
    }

    pub fn fit(&self, df: &DataFrame) -> Result<FittedModel, ModelError> {
        if df.column(&self.target).is_err() {
            return Err(ModelError::MissingTarget(self.target.clone()));
        }

        let features: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .filter(|n| n != &self.target)
            .collect();

        let target = Aggregator::float_values(df, &self.target)?;
        let columns: Vec<Vec<Option<f64>>> = features
            .iter()
            .map(|f| Aggregator::float_values(df, f))
            .collect::<Result<_, _>>()?;

        let is_present = |v: Option<f64>| v.is_some_and(f64::is_finite);
        let complete: Vec<usize> = (0..df.height())
            .filter(|&i| is_present(target[i]) && columns.iter().all(|c| is_present(c[i])))
            .collect();
        let dropped = df.height() - complete.len();
        if dropped > 0 {
            warn!(dropped, "rows with missing values left out of the fit");
        }

        let local = split_indices(complete.len(), self.split);
        let partition = Partition {
            train: local.train.iter().map(|&i| complete[i]).collect(),
            test: local.test.iter().map(|&i| complete[i]).collect(),
        };

        let required = features.len() + 1;
        if partition.train.len() < required || partition.test.is_empty() {
            return Err(ModelError::InsufficientRows {
                rows: complete.len(),
                required,
            });
        }
        debug!(
            train = partition.train.len(),
            test = partition.test.len(),
            features = features.len(),
            "partitioned rows"
        );

        let active = Self::independent_columns(&columns, &partition.train);
        for (j, feature) in features.iter().enumerate() {
            if !active.contains(&j) {
                warn!(
                    feature = %feature,
                    "collinear with the intercept or earlier features, weight fixed at 0"
                );
            }
        }
        if active.is_empty() {
            return Err(ModelError::Fit(
                "no feature varies over the training rows".to_string(),
            ));
        }
        let used: Vec<&[Option<f64>]> = active.iter().map(|&j| columns[j].as_slice()).collect();

        let (x_train, y_train) = Self::design(&used, &target, &partition.train)?;
        let (x_test, y_test) = Self::design(&used, &target, &partition.test)?;

        let mut model = LinearRegression::new();
        model
            .fit(&x_train, &y_train)
            .map_err(|e| ModelError::Fit(e.to_string()))?;

        let y_pred = model.predict(&x_test);
        let error = f64::from(mse(&y_pred, &y_test));

        let mut weights = vec![0.0; features.len()];
        for (&j, &w) in active.iter().zip(model.coefficients().as_slice()) {
            weights[j] = f64::from(w);
        }

        info!(column = %self.target, mse = error, "fitted linear model");
        Ok(FittedModel {
            target: self.target.clone(),
            features,
            weights,
            intercept: f64::from(model.intercept()),
            partition,
            mse: error,
        })
    }

    /// Columns that stay linearly independent of the intercept and of the columns
    /// kept before them, over `rows`. Greedy Gram-Schmidt in column order, so in an
    /// indicator group whose reference level has no rows the last indicator goes.
    fn independent_columns(columns: &[Vec<Option<f64>>], rows: &[usize]) -> Vec<usize> {
        let n = rows.len();
        if n == 0 {
            return Vec::new();
        }
        let mut basis: Vec<Vec<f64>> = vec![vec![1.0 / (n as f64).sqrt(); n]];
        let mut kept = Vec::new();

        for (j, column) in columns.iter().enumerate() {
            let mut v: Vec<f64> = rows.iter().map(|&row| column[row].unwrap_or(0.0)).collect();
            let scale = v.iter().map(|x| x * x).sum::<f64>().sqrt();
            for b in &basis {
                let dot: f64 = v.iter().zip(b).map(|(x, y)| x * y).sum();
                v.iter_mut().zip(b).for_each(|(x, y)| *x -= dot * y);
            }
            let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm > COLLINEARITY_TOLERANCE * scale.max(1.0) {
                v.iter_mut().for_each(|x| *x /= norm);
                basis.push(v);
                kept.push(j);
            }
        }
        kept
    }

    /// Row-major feature matrix and target vector for the given rows.
    fn design(
        columns: &[&[Option<f64>]],
        target: &[Option<f64>],
        rows: &[usize],
    ) -> Result<(Matrix<f32>, Vector<f32>), ModelError> {
        let mut data = Vec::with_capacity(rows.len() * columns.len());
        for &row in rows {
            for column in columns {
                data.push(column[row].unwrap_or(f64::NAN) as f32);
            }
        }
        let y: Vec<f32> = rows
            .iter()
            .map(|&row| target[row].unwrap_or(f64::NAN) as f32)
            .collect();

        let x = Matrix::from_vec(rows.len(), columns.len(), data)
            .map_err(|e| ModelError::Fit(e.to_string()))?;
        Ok((x, Vector::from_vec(y)))
    }
}
