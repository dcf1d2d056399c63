//! Pipeline
//! Load, normalize, aggregate, chart and fit in one pass over the input file.

use crate::charts::{ChartBackend, RenderError, Reporter};
use crate::config::{Config, ConfigError};
use crate::data::schema::{
    BINARY_FIELDS, EDUCATION_ORDER, MATH_SCORE, PARENTAL_EDUCATION, SCORE_COLUMNS,
};
use crate::data::{DataLoader, DataProcessor, LoaderError, ProcessorError};
use crate::model::{FeatureWeight, FittedModel, ModelError, ModelFit};
use crate::stats::{correlation_matrix, describe, AggregateTable, Aggregator, ColumnSummary, StatsError};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Fitted model figures reported after a run.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub target: String,
    pub mse: f64,
    pub intercept: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub weights: Vec<FeatureWeight>,
}

impl From<&FittedModel> for ModelSummary {
    fn from(model: &FittedModel) -> Self {
        Self {
            target: model.target.clone(),
            mse: model.mse,
            intercept: model.intercept,
            train_rows: model.partition.train.len(),
            test_rows: model.partition.test.len(),
            weights: model.feature_weights(),
        }
    }
}

/// Everything a run produced, in a form that prints as text or JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input: PathBuf,
    pub rows: usize,
    /// Column order of the encoded table.
    pub columns: Vec<String>,
    pub scores: Vec<ColumnSummary>,
    pub aggregate: AggregateTable,
    pub model: ModelSummary,
    /// Written chart files, in the order they were produced.
    pub artifacts: Vec<PathBuf>,
}

impl RunSummary {
    /// File names of the written charts, comma separated.
    pub fn artifact_names(&self) -> String {
        self.artifacts
            .iter()
            .map(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| p.display().to_string())
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Run every stage against `config`, drawing through `backend`.
///
/// Stops at the first failure; charts written before it stay on disk.
pub fn run(config: &Config, backend: &mut dyn ChartBackend) -> Result<RunSummary, PipelineError> {
    config.validate()?;

    let raw = DataLoader::new(&config.input).load()?;
    let named = DataProcessor::normalize_columns(&raw)?;
    let encoded = DataProcessor::encode(&named, config.policy)?;
    info!(
        rows = encoded.height(),
        columns = encoded.width(),
        "normalized table ready"
    );

    let mut scores = Vec::with_capacity(SCORE_COLUMNS.len());
    for column in SCORE_COLUMNS {
        let values: Vec<f64> = Aggregator::float_values(&encoded, column)?
            .into_iter()
            .flatten()
            .collect();
        let summary = describe(column, &values);
        info!(
            column,
            mean = summary.mean,
            median = summary.median,
            std = summary.std,
            "score summary"
        );
        scores.push(summary);
    }

    let aggregate =
        Aggregator::group_means(&named, PARENTAL_EDUCATION, &EDUCATION_ORDER, &SCORE_COLUMNS)?;

    let mut reporter = Reporter::new(backend, &config.output_dir);
    let mut artifacts = vec![
        reporter.score_distributions(&named)?,
        reporter.trend(&aggregate)?,
    ];

    let model = ModelFit::new(MATH_SCORE, config.split).fit(&encoded)?;
    artifacts.push(reporter.model_weights(&model)?);

    if config.correlation {
        let columns: Vec<&str> = SCORE_COLUMNS
            .iter()
            .copied()
            .chain(BINARY_FIELDS.iter().map(|f| f.column))
            .collect();
        let matrix = correlation_matrix(&encoded, &columns)?;
        artifacts.push(reporter.correlation(&matrix)?);
    }

    Ok(RunSummary {
        input: config.input.clone(),
        rows: encoded.height(),
        columns: DataLoader::column_names(&encoded),
        scores,
        aggregate,
        model: ModelSummary::from(&model),
        artifacts,
    })
}
