//! Figure descriptions handed to a `ChartBackend`.
//! Plain data: what to draw, never how.

use crate::charts::RenderError;

/// Physical figure size; pixels are derived from the renderer's DPI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSize {
    pub width_in: f64,
    pub height_in: f64,
}

impl FigureSize {
    pub const fn new(width_in: f64, height_in: f64) -> Self {
        Self {
            width_in,
            height_in,
        }
    }

    pub fn pixels(&self, dpi: u32) -> (u32, u32) {
        (
            (self.width_in * dpi as f64).round() as u32,
            (self.height_in * dpi as f64).round() as u32,
        )
    }
}

/// A named list of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// One histogram panel with overlaid series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramPanel {
    pub title: String,
    pub x_label: String,
    pub series: Vec<Series>,
}

/// Side-by-side histogram panels sharing bins and range.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramFigure {
    pub title: String,
    pub size: FigureSize,
    pub bins: usize,
    pub range: (f64, f64),
    pub panels: Vec<HistogramPanel>,
}

impl HistogramFigure {
    pub fn validate(&self) -> Result<(), RenderError> {
        let (lo, hi) = self.range;
        if self.bins == 0 || !(lo < hi) {
            return Err(RenderError::invalid(&self.title, "empty histogram range"));
        }
        if self.panels.is_empty() {
            return Err(RenderError::invalid(&self.title, "no panels"));
        }
        for panel in &self.panels {
            let finite = panel
                .series
                .iter()
                .flat_map(|s| &s.values)
                .any(|v| v.is_finite());
            if !finite {
                return Err(RenderError::invalid(&panel.title, "no finite values"));
            }
        }
        Ok(())
    }
}

/// Count values per equal-width bin over `range`; the last bin is closed on the right.
pub fn histogram_bins(values: &[f64], bins: usize, range: (f64, f64)) -> Vec<usize> {
    let mut counts = vec![0usize; bins];
    let (lo, hi) = range;
    if bins == 0 || !(lo < hi) {
        return counts;
    }
    let width = (hi - lo) / bins as f64;
    for &v in values {
        if !v.is_finite() || v < lo || v > hi {
            continue;
        }
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
}

/// Bars grouped per category, one bar per series.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedBarChart {
    pub title: String,
    pub size: FigureSize,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    /// Decimal places of the value printed above each bar; `None` disables labels.
    pub annotate: Option<usize>,
}

impl GroupedBarChart {
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.categories.is_empty() {
            return Err(RenderError::invalid(&self.title, "no categories"));
        }
        if self.series.is_empty() {
            return Err(RenderError::invalid(&self.title, "no series"));
        }
        if let Some(s) = self
            .series
            .iter()
            .find(|s| s.values.len() != self.categories.len())
        {
            return Err(RenderError::invalid(
                &self.title,
                format!(
                    "series '{}' has {} values for {} categories",
                    s.label,
                    s.values.len(),
                    self.categories.len()
                ),
            ));
        }
        if !self.series.iter().flat_map(|s| &s.values).any(|v| v.is_finite()) {
            return Err(RenderError::invalid(&self.title, "no finite values"));
        }
        Ok(())
    }

    /// Largest finite value, used for the value axis.
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| &s.values)
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }
}

/// One horizontal bar per label.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalBarChart {
    pub title: String,
    pub size: FigureSize,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl HorizontalBarChart {
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.labels.is_empty() {
            return Err(RenderError::invalid(&self.title, "no bars"));
        }
        if self.labels.len() != self.values.len() {
            return Err(RenderError::invalid(
                &self.title,
                format!("{} labels for {} values", self.labels.len(), self.values.len()),
            ));
        }
        if self.values.iter().any(|v| !v.is_finite()) {
            return Err(RenderError::invalid(&self.title, "non-finite bar length"));
        }
        Ok(())
    }

    /// Value-axis range including zero, padded by 10%.
    pub fn value_range(&self) -> (f64, f64) {
        let lo = self.values.iter().copied().fold(0.0, f64::min);
        let hi = self.values.iter().copied().fold(0.0, f64::max);
        let pad = ((hi - lo) * 0.1).max(1e-6);
        (lo - pad, hi + pad)
    }
}

/// Square matrix of colored cells with a text label per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub title: String,
    pub size: FigureSize,
    pub labels: Vec<String>,
    /// Row-major values in [-1, 1].
    pub values: Vec<f64>,
    pub annotations: Vec<String>,
}

impl Heatmap {
    pub fn validate(&self) -> Result<(), RenderError> {
        let n = self.labels.len();
        if n == 0 {
            return Err(RenderError::invalid(&self.title, "no labels"));
        }
        if self.values.len() != n * n || self.annotations.len() != n * n {
            return Err(RenderError::invalid(
                &self.title,
                format!("expected {} cells, got {}", n * n, self.values.len()),
            ));
        }
        Ok(())
    }
}

/// Tick label for a category axis whose categories sit at integer positions.
pub fn category_label(labels: &[String], position: f64) -> String {
    let idx = position.round();
    if (position - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}
