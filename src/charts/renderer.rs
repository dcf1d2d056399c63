//! Static Chart Renderer
//! Writes PNG charts with plotters' bitmap backend.
//!
//! Sizes are given in inches and scaled by the configured DPI; font sizes are given
//! in points and scaled the same way, so a chart looks alike at any resolution.

use crate::charts::figure::{
    category_label, histogram_bins, GroupedBarChart, Heatmap, HistogramFigure,
    HorizontalBarChart,
};
use crate::charts::{ChartBackend, RenderError};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::debug;

// Series colors (RGB)
const PALETTE: [RGBColor; 4] = [
    RGBColor(91, 155, 213),  // Blue
    RGBColor(237, 125, 49),  // Orange
    RGBColor(112, 173, 71),  // Green
    RGBColor(155, 89, 182),  // Purple
];
const NEGATIVE: RGBColor = RGBColor(59, 76, 192); // Heatmap r = -1
const POSITIVE: RGBColor = RGBColor(180, 4, 38); // Heatmap r = +1

const FONT_FAMILY: &str = "sans-serif";

pub struct StaticChartRenderer {
    dpi: u32,
}

impl StaticChartRenderer {
    pub fn new(dpi: u32) -> Self {
        Self { dpi: dpi.max(1) }
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Points to pixels.
    fn px(&self, points: f64) -> u32 {
        (points * self.dpi as f64 / 72.0).round().max(1.0) as u32
    }

    fn font(&self, points: f64) -> FontDesc<'static> {
        (FONT_FAMILY, self.px(points) as f64).into_font()
    }

    fn series_color(idx: usize) -> RGBColor {
        PALETTE[idx % PALETTE.len()]
    }

    /// Blend from blue (-1) through white (0) to red (+1).
    fn diverging(value: f64) -> RGBColor {
        let v = if value.is_finite() { value.clamp(-1.0, 1.0) } else { 0.0 };
        let (end, t) = if v < 0.0 { (NEGATIVE, -v) } else { (POSITIVE, v) };
        let mix = |c: u8| (255.0 + (c as f64 - 255.0) * t).round() as u8;
        RGBColor(mix(end.0), mix(end.1), mix(end.2))
    }
}

impl ChartBackend for StaticChartRenderer {
    fn draw_histograms(
        &mut self,
        figure: &HistogramFigure,
        output: &Path,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(output, figure.size.pixels(self.dpi)).into_drawing_area();
        root.fill(&WHITE)?;
        let root = root.titled(&figure.title, self.font(16.0))?;

        let (lo, hi) = figure.range;
        let width = (hi - lo) / figure.bins as f64;
        let areas = root.split_evenly((1, figure.panels.len()));

        for (panel, area) in figure.panels.iter().zip(areas.iter()) {
            let counts: Vec<Vec<usize>> = panel
                .series
                .iter()
                .map(|s| histogram_bins(&s.values, figure.bins, figure.range))
                .collect();
            let peak = counts.iter().flatten().copied().max().unwrap_or(0).max(1);

            let mut chart = ChartBuilder::on(area)
                .caption(&panel.title, self.font(12.0))
                .margin(self.px(6.0))
                .x_label_area_size(self.px(28.0))
                .y_label_area_size(self.px(36.0))
                .build_cartesian_2d(lo..hi, 0f64..(peak as f64 * 1.1))?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_desc(&panel.x_label)
                .y_desc("Count")
                .label_style(self.font(9.0))
                .axis_desc_style(self.font(10.0))
                .draw()?;

            for (idx, (series, bins)) in panel.series.iter().zip(&counts).enumerate() {
                let color = Self::series_color(idx);
                chart
                    .draw_series(bins.iter().enumerate().filter(|(_, c)| **c > 0).map(
                        |(b, &c)| {
                            let x0 = lo + b as f64 * width;
                            Rectangle::new([(x0, 0.0), (x0 + width, c as f64)], color.mix(0.5).filled())
                        },
                    ))?
                    .label(&series.label)
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
            }

            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font(self.font(9.0))
                .draw()?;
        }

        root.present()?;
        debug!(path = %output.display(), "wrote histogram figure");
        Ok(())
    }

    fn draw_grouped_bars(
        &mut self,
        chart: &GroupedBarChart,
        output: &Path,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(output, chart.size.pixels(self.dpi)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = chart.categories.len();
        let k = chart.series.len();
        let y_max = (chart.max_value() * 1.15).max(1.0);
        let categories = chart.categories.clone();
        let label_for = move |x: &f64| category_label(&categories, *x);

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, self.font(14.0))
            .margin(self.px(10.0))
            .x_label_area_size(self.px(36.0))
            .y_label_area_size(self.px(40.0))
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&label_for)
            .x_desc(&chart.x_label)
            .y_desc(&chart.y_label)
            .label_style(self.font(10.0))
            .axis_desc_style(self.font(11.0))
            .draw()?;

        // Each category spans 0.8 of its unit slot, split evenly between series.
        let bar_width = 0.8 / k as f64;
        let value_style = TextStyle::from(self.font(8.0)).pos(Pos::new(HPos::Center, VPos::Bottom));

        for (s, series) in chart.series.iter().enumerate() {
            let color = Self::series_color(s);
            let bars: Vec<(f64, f64)> = series
                .values
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_finite())
                .map(|(i, &v)| (i as f64 - 0.4 + s as f64 * bar_width, v))
                .collect();

            ctx.draw_series(
                bars.iter()
                    .map(|&(x0, v)| Rectangle::new([(x0, 0.0), (x0 + bar_width, v)], color.filled())),
            )?
            .label(&series.label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));

            if let Some(decimals) = chart.annotate {
                ctx.draw_series(bars.iter().map(|&(x0, v)| {
                    Text::new(
                        format!("{:.*}", decimals, v),
                        (x0 + bar_width / 2.0, v),
                        value_style.clone(),
                    )
                }))?;
            }
        }

        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font(self.font(9.0))
            .draw()?;

        root.present()?;
        debug!(path = %output.display(), "wrote grouped bar chart");
        Ok(())
    }

    fn draw_horizontal_bars(
        &mut self,
        chart: &HorizontalBarChart,
        output: &Path,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(output, chart.size.pixels(self.dpi)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = chart.labels.len();
        let (x_lo, x_hi) = chart.value_range();
        let labels = chart.labels.clone();
        let label_for = move |y: &f64| category_label(&labels, *y);
        let longest = chart.labels.iter().map(|l| l.len()).max().unwrap_or(0);

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, self.font(14.0))
            .margin(self.px(10.0))
            .x_label_area_size(self.px(30.0))
            .y_label_area_size(self.px(12.0 + longest as f64 * 5.0))
            .build_cartesian_2d(x_lo..x_hi, -0.5f64..(n as f64 - 0.5))?;

        ctx.configure_mesh()
            .disable_y_mesh()
            .y_labels(n)
            .y_label_formatter(&label_for)
            .x_desc(&chart.x_label)
            .y_desc(&chart.y_label)
            .label_style(self.font(9.0))
            .axis_desc_style(self.font(11.0))
            .draw()?;

        let color = Self::series_color(0);
        ctx.draw_series(chart.values.iter().enumerate().map(|(i, &v)| {
            let y = i as f64;
            Rectangle::new([(0.0, y - 0.4), (v, y + 0.4)], color.filled())
        }))?;

        root.present()?;
        debug!(path = %output.display(), bars = n, "wrote horizontal bar chart");
        Ok(())
    }

    fn draw_heatmap(&mut self, chart: &Heatmap, output: &Path) -> Result<(), RenderError> {
        let root = BitMapBackend::new(output, chart.size.pixels(self.dpi)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = chart.labels.len();
        let x_labels = chart.labels.clone();
        // Row 0 is drawn at the top.
        let y_labels: Vec<String> = chart.labels.iter().rev().cloned().collect();
        let x_label_for = move |x: &f64| category_label(&x_labels, *x);
        let y_label_for = move |y: &f64| category_label(&y_labels, *y);
        let longest = chart.labels.iter().map(|l| l.len()).max().unwrap_or(0);
        let label_area = self.px(12.0 + longest as f64 * 5.0);

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, self.font(14.0))
            .margin(self.px(10.0))
            .x_label_area_size(label_area)
            .y_label_area_size(label_area)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), -0.5f64..(n as f64 - 0.5))?;

        ctx.configure_mesh()
            .disable_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_formatter(&x_label_for)
            .y_label_formatter(&y_label_for)
            .x_label_style(self.font(9.0).transform(FontTransform::Rotate90))
            .y_label_style(self.font(9.0))
            .draw()?;

        let cells: Vec<(f64, f64, f64, &str)> = (0..n)
            .flat_map(|row| (0..n).map(move |col| (row, col)))
            .map(|(row, col)| {
                let idx = row * n + col;
                (
                    col as f64,
                    (n - 1 - row) as f64,
                    chart.values[idx],
                    chart.annotations[idx].as_str(),
                )
            })
            .collect();

        ctx.draw_series(cells.iter().map(|&(x, y, v, _)| {
            Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                Self::diverging(v).filled(),
            )
        }))?;

        let cell_style =
            TextStyle::from(self.font(10.0)).pos(Pos::new(HPos::Center, VPos::Center));
        ctx.draw_series(
            cells
                .iter()
                .map(|&(x, y, _, text)| Text::new(text.to_string(), (x, y), cell_style.clone())),
        )?;

        root.present()?;
        debug!(path = %output.display(), size = n, "wrote heatmap");
        Ok(())
    }
}
