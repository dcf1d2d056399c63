//! Shared fixtures: a synthetic student CSV and a chart backend that only records.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use score_insight::charts::{
    ChartBackend, GroupedBarChart, Heatmap, HistogramFigure, HorizontalBarChart, RenderError,
};
use score_insight::data::schema::EDUCATION_ORDER;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub const HEADER: &str = "gender,race/ethnicity,parental level of education,lunch,\
test preparation course,math score,reading score,writing score";

const RACES: [&str; 5] = ["group A", "group B", "group C", "group D", "group E"];

#[derive(Debug, Clone)]
pub struct StudentRow {
    pub gender: String,
    pub race: String,
    pub education: String,
    pub lunch: String,
    pub preparation: String,
    pub math: i64,
    pub reading: i64,
    pub writing: i64,
}

/// `n` students with every category drawn at random from its declared levels.
pub fn student_rows(n: usize, seed: u64) -> Vec<StudentRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let male = rng.gen_bool(0.5);
            let standard = rng.gen_bool(0.65);
            let completed = rng.gen_bool(0.35);
            let rank = rng.gen_range(0..EDUCATION_ORDER.len());
            let race = RACES[rng.gen_range(0..RACES.len())];

            let base = 45.0
                + if male { 5.0 } else { 0.0 }
                + if standard { 10.0 } else { 0.0 }
                + if completed { 6.0 } else { 0.0 }
                + 2.0 * rank as f64;
            let clamp = |v: f64| v.round().clamp(0.0, 100.0) as i64;
            let math = clamp(base + rng.gen_range(-15.0..15.0));
            let reading = clamp(base + rng.gen_range(-12.0..12.0) - if male { 8.0 } else { 0.0 });
            let writing = clamp(reading as f64 + rng.gen_range(-5.0..5.0));

            StudentRow {
                gender: if male { "male" } else { "female" }.to_string(),
                race: race.to_string(),
                education: EDUCATION_ORDER[rank].to_string(),
                lunch: if standard { "standard" } else { "free/reduced" }.to_string(),
                preparation: if completed { "completed" } else { "none" }.to_string(),
                math,
                reading,
                writing,
            }
        })
        .collect()
}

pub fn to_csv(rows: &[StudentRow]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for r in rows {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            r.gender, r.race, r.education, r.lunch, r.preparation, r.math, r.reading, r.writing
        );
    }
    out
}

pub fn write_csv(dir: &Path, rows: &[StudentRow]) -> PathBuf {
    let path = dir.join("StudentsPerformance.csv");
    std::fs::write(&path, to_csv(rows)).unwrap();
    path
}

/// Records every draw call and touches the output file instead of rendering it.
#[derive(Default)]
pub struct RecordingBackend {
    pub calls: Vec<(&'static str, PathBuf)>,
    pub histograms: Vec<HistogramFigure>,
    pub grouped: Vec<GroupedBarChart>,
    pub horizontal: Vec<HorizontalBarChart>,
    pub heatmaps: Vec<Heatmap>,
    /// Fail the first call of this kind with a backend error.
    pub fail_on: Option<&'static str>,
}

impl RecordingBackend {
    pub fn failing_on(kind: &'static str) -> Self {
        Self {
            fail_on: Some(kind),
            ..Self::default()
        }
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.calls.iter().map(|(kind, _)| *kind).collect()
    }

    fn record(&mut self, kind: &'static str, output: &Path) -> Result<(), RenderError> {
        if self.fail_on == Some(kind) {
            return Err(RenderError::Backend(format!("{kind} refused")));
        }
        std::fs::write(output, b"").map_err(|e| RenderError::Backend(e.to_string()))?;
        self.calls.push((kind, output.to_path_buf()));
        Ok(())
    }
}

impl ChartBackend for RecordingBackend {
    fn draw_histograms(
        &mut self,
        figure: &HistogramFigure,
        output: &Path,
    ) -> Result<(), RenderError> {
        self.record("histograms", output)?;
        self.histograms.push(figure.clone());
        Ok(())
    }

    fn draw_grouped_bars(
        &mut self,
        chart: &GroupedBarChart,
        output: &Path,
    ) -> Result<(), RenderError> {
        self.record("grouped_bars", output)?;
        self.grouped.push(chart.clone());
        Ok(())
    }

    fn draw_horizontal_bars(
        &mut self,
        chart: &HorizontalBarChart,
        output: &Path,
    ) -> Result<(), RenderError> {
        self.record("horizontal_bars", output)?;
        self.horizontal.push(chart.clone());
        Ok(())
    }

    fn draw_heatmap(&mut self, chart: &Heatmap, output: &Path) -> Result<(), RenderError> {
        self.record("heatmap", output)?;
        self.heatmaps.push(chart.clone());
        Ok(())
    }
}
