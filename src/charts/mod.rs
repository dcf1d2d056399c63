//! Charts module - figure descriptions, rendering backends and the reporter

mod figure;
mod renderer;
mod reporter;

pub use figure::{
    category_label, histogram_bins, FigureSize, GroupedBarChart, Heatmap, HistogramFigure,
    HistogramPanel, HorizontalBarChart, Series,
};
pub use renderer::StaticChartRenderer;
pub use reporter::{Reporter, VIZ_CORRELATION, VIZ_DISTRIBUTION, VIZ_MODEL, VIZ_TREND};

use plotters::drawing::DrawingAreaErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("render failure in '{chart}': {reason}")]
    InvalidData { chart: String, reason: String },
    #[error("render failure: {0}")]
    Backend(String),
    #[error("cannot prepare output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl RenderError {
    pub fn invalid(chart: &str, reason: impl Into<String>) -> Self {
        RenderError::InvalidData {
            chart: chart.to_string(),
            reason: reason.into(),
        }
    }
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Backend(e.to_string())
    }
}

/// Drawing capabilities the reporter needs. Each call writes one image to `output`,
/// replacing any existing file.
pub trait ChartBackend {
    fn draw_histograms(&mut self, figure: &HistogramFigure, output: &Path)
        -> Result<(), RenderError>;

    fn draw_grouped_bars(&mut self, chart: &GroupedBarChart, output: &Path)
        -> Result<(), RenderError>;

    fn draw_horizontal_bars(
        &mut self,
        chart: &HorizontalBarChart,
        output: &Path,
    ) -> Result<(), RenderError>;

    fn draw_heatmap(&mut self, chart: &Heatmap, output: &Path) -> Result<(), RenderError>;
}
