//! Reporter
//! Turns the pipeline's tables into figures and hands them to a backend.

use crate::charts::figure::{
    FigureSize, GroupedBarChart, Heatmap, HistogramFigure, HistogramPanel, HorizontalBarChart,
    Series,
};
use crate::charts::{ChartBackend, RenderError};
use crate::data::schema::{BINARY_FIELDS, GENDER, SCORE_COLUMNS};
use crate::data::DataProcessor;
use crate::model::FittedModel;
use crate::stats::{Aggregator, AggregateTable, CorrelationMatrix};
use polars::prelude::DataFrame;
use std::path::PathBuf;
use tracing::info;

pub const VIZ_DISTRIBUTION: &str = "viz1_complexity.png";
pub const VIZ_TREND: &str = "viz2_trend.png";
pub const VIZ_MODEL: &str = "viz3_model.png";
pub const VIZ_CORRELATION: &str = "viz4_correlation.png";

const DISTRIBUTION_SIZE: FigureSize = FigureSize::new(15.0, 5.0);
const TREND_SIZE: FigureSize = FigureSize::new(12.0, 6.0);
const MODEL_SIZE: FigureSize = FigureSize::new(10.0, 6.0);
const CORRELATION_SIZE: FigureSize = FigureSize::new(8.0, 7.0);

/// Score histograms use 5-point bins over the full score scale.
const SCORE_RANGE: (f64, f64) = (0.0, 100.0);
const SCORE_BINS: usize = 20;

/// `math_score` -> `Math Score`.
pub fn display_name(column: &str) -> String {
    column
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Writes the chart artifacts of a run into one output directory.
pub struct Reporter<'a> {
    backend: &'a mut dyn ChartBackend,
    output_dir: PathBuf,
}

impl<'a> Reporter<'a> {
    pub fn new(backend: &'a mut dyn ChartBackend, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            output_dir: output_dir.into(),
        }
    }

    fn artifact(&self, name: &str) -> Result<PathBuf, RenderError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| RenderError::OutputDir {
            path: self.output_dir.clone(),
            source,
        })?;
        Ok(self.output_dir.join(name))
    }

    /// Score distributions per gender (`viz1`).
    pub fn score_distributions(&mut self, raw: &DataFrame) -> Result<PathBuf, RenderError> {
        let figure = Self::distribution_figure(raw)?;
        figure.validate()?;
        let path = self.artifact(VIZ_DISTRIBUTION)?;
        self.backend.draw_histograms(&figure, &path)?;
        info!(path = %path.display(), "saved score distributions");
        Ok(path)
    }

    /// Mean scores by parental education (`viz2`).
    pub fn trend(&mut self, aggregate: &AggregateTable) -> Result<PathBuf, RenderError> {
        let chart = Self::trend_chart(aggregate);
        chart.validate()?;
        let path = self.artifact(VIZ_TREND)?;
        self.backend.draw_grouped_bars(&chart, &path)?;
        info!(path = %path.display(), "saved trend chart");
        Ok(path)
    }

    /// Fitted weight per feature (`viz3`).
    pub fn model_weights(&mut self, model: &FittedModel) -> Result<PathBuf, RenderError> {
        let chart = Self::weights_chart(model);
        chart.validate()?;
        let path = self.artifact(VIZ_MODEL)?;
        self.backend.draw_horizontal_bars(&chart, &path)?;
        info!(path = %path.display(), "saved model weights");
        Ok(path)
    }

    /// Pairwise correlations (`viz4`).
    pub fn correlation(&mut self, matrix: &CorrelationMatrix) -> Result<PathBuf, RenderError> {
        let chart = Self::correlation_heatmap(matrix);
        chart.validate()?;
        let path = self.artifact(VIZ_CORRELATION)?;
        self.backend.draw_heatmap(&chart, &path)?;
        info!(path = %path.display(), "saved correlation heatmap");
        Ok(path)
    }

    pub fn distribution_figure(raw: &DataFrame) -> Result<HistogramFigure, RenderError> {
        let title = "Distribution of Test Scores by Gender";
        let genders = DataProcessor::string_values(raw, GENDER)
            .map_err(|e| RenderError::invalid(title, e.to_string()))?;
        let levels: Vec<&str> = BINARY_FIELDS
            .iter()
            .find(|f| f.column == GENDER)
            .map(|f| f.codes.iter().map(|(label, _)| *label).collect())
            .unwrap_or_default();

        let mut panels = Vec::with_capacity(SCORE_COLUMNS.len());
        for column in SCORE_COLUMNS {
            let scores = Aggregator::float_values(raw, column)
                .map_err(|e| RenderError::invalid(title, e.to_string()))?;
            let series = levels
                .iter()
                .map(|level| {
                    let values = genders
                        .iter()
                        .zip(&scores)
                        .filter(|(g, _)| g.as_deref() == Some(*level))
                        .filter_map(|(_, s)| *s)
                        .collect();
                    Series::new(*level, values)
                })
                .collect();
            panels.push(HistogramPanel {
                title: display_name(column),
                x_label: "Score".to_string(),
                series,
            });
        }

        Ok(HistogramFigure {
            title: title.to_string(),
            size: DISTRIBUTION_SIZE,
            bins: SCORE_BINS,
            range: SCORE_RANGE,
            panels,
        })
    }

    pub fn trend_chart(aggregate: &AggregateTable) -> GroupedBarChart {
        let series = aggregate
            .value_columns
            .iter()
            .map(|column| {
                Series::new(
                    column.as_str(),
                    aggregate.series(column).unwrap_or_default(),
                )
            })
            .collect();

        GroupedBarChart {
            title: format!(
                "Average Test Scores by {}",
                display_name(&aggregate.key_column).replace(" Of ", " of ")
            ),
            size: TREND_SIZE,
            x_label: display_name(&aggregate.key_column).replace(" Of ", " of "),
            y_label: "Average Score".to_string(),
            categories: aggregate.categories().iter().map(|c| c.to_string()).collect(),
            series,
            annotate: Some(1),
        }
    }

    pub fn weights_chart(model: &FittedModel) -> HorizontalBarChart {
        HorizontalBarChart {
            title: format!("Feature Importance for Predicting {}", display_name(&model.target)),
            size: MODEL_SIZE,
            x_label: "Coefficient Value".to_string(),
            y_label: "Feature".to_string(),
            labels: model.features.clone(),
            values: model.weights.clone(),
        }
    }

    pub fn correlation_heatmap(matrix: &CorrelationMatrix) -> Heatmap {
        let n = matrix.size();
        let annotations = (0..n * n)
            .map(|idx| {
                let (row, col) = (idx / n, idx % n);
                let r = matrix.get(row, col);
                if r.is_nan() {
                    "n/a".to_string()
                } else if matrix.is_significant(row, col) {
                    format!("{r:.2}*")
                } else {
                    format!("{r:.2}")
                }
            })
            .collect();

        Heatmap {
            title: "Correlation Between Scores and Binary Attributes".to_string(),
            size: CORRELATION_SIZE,
            labels: matrix.columns.clone(),
            values: matrix.r.clone(),
            annotations,
        }
    }
}
