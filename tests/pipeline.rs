//! End-to-end runs of the pipeline against generated CSV files.

mod common;

use common::{student_rows, write_csv, RecordingBackend};
use score_insight::charts::{RenderError, VIZ_CORRELATION, VIZ_DISTRIBUTION, VIZ_MODEL, VIZ_TREND};
use score_insight::config::{Config, ConfigError};
use score_insight::data::schema::{EDUCATION_ORDER, MATH_SCORE};
use score_insight::data::{CategoryPolicy, LoaderError, ProcessorError};
use score_insight::{run, PipelineError};
use std::path::Path;
use tempfile::TempDir;

fn config_for(dir: &Path, input: &Path) -> Config {
    Config {
        input: input.to_path_buf(),
        output_dir: dir.join("out"),
        ..Config::default()
    }
}

fn file_names(paths: &[std::path::PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_run_writes_three_charts_in_order() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(dir.path(), &student_rows(300, 1));
    let config = config_for(dir.path(), &input);
    let mut backend = RecordingBackend::default();

    let summary = run(&config, &mut backend).unwrap();

    assert_eq!(
        file_names(&summary.artifacts),
        vec![VIZ_DISTRIBUTION, VIZ_TREND, VIZ_MODEL]
    );
    assert_eq!(
        backend.kinds(),
        vec!["histograms", "grouped_bars", "horizontal_bars"]
    );
    for path in &summary.artifacts {
        assert!(path.starts_with(dir.path().join("out")));
        assert!(path.is_file());
    }
    assert_eq!(
        summary.artifact_names(),
        "viz1_complexity.png, viz2_trend.png, viz3_model.png"
    );

    assert_eq!(summary.rows, 300);
    assert_eq!(summary.columns.len(), 15);
    assert_eq!(summary.scores.len(), 3);
    assert_eq!(summary.scores[0].count, 300);
    assert_eq!(summary.model.target, MATH_SCORE);
    assert_eq!(summary.model.weights.len(), 14);
    assert_eq!(summary.model.test_rows, 60);
    assert_eq!(summary.model.train_rows, 240);
    assert!(summary.model.mse.is_finite() && summary.model.mse > 0.0);
}

#[test]
fn test_distribution_figure_covers_every_student() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(dir.path(), &student_rows(200, 2));
    let mut backend = RecordingBackend::default();
    run(&config_for(dir.path(), &input), &mut backend).unwrap();

    let figure = &backend.histograms[0];
    assert_eq!(figure.panels.len(), 3);
    for panel in &figure.panels {
        let labels: Vec<&str> = panel.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["female", "male"]);
        let total: usize = panel.series.iter().map(|s| s.values.len()).sum();
        assert_eq!(total, 200);
    }
}

#[test]
fn test_trend_follows_education_rank() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(dir.path(), &student_rows(300, 3));
    let mut backend = RecordingBackend::default();
    let summary = run(&config_for(dir.path(), &input), &mut backend).unwrap();

    assert_eq!(summary.aggregate.categories(), EDUCATION_ORDER.to_vec());
    let chart = &backend.grouped[0];
    assert_eq!(chart.categories, EDUCATION_ORDER.to_vec());
    assert_eq!(chart.series.len(), 3);
    assert_eq!(chart.annotate, Some(1));
    let counted: usize = summary.aggregate.rows.iter().map(|r| r.count).sum();
    assert_eq!(counted, 300);
}

#[test]
fn test_aggregate_ignores_row_order() {
    let dir = TempDir::new().unwrap();
    let rows = student_rows(250, 4);
    let forward = write_csv(dir.path(), &rows);
    let first = run(&config_for(dir.path(), &forward), &mut RecordingBackend::default()).unwrap();

    let reversed_dir = TempDir::new().unwrap();
    let mut reversed_rows = rows.clone();
    reversed_rows.reverse();
    let reversed = write_csv(reversed_dir.path(), &reversed_rows);
    let second = run(
        &config_for(reversed_dir.path(), &reversed),
        &mut RecordingBackend::default(),
    )
    .unwrap();

    assert_eq!(first.aggregate.categories(), second.aggregate.categories());
    for (a, b) in first.aggregate.rows.iter().zip(&second.aggregate.rows) {
        assert_eq!(a.count, b.count);
        for (x, y) in a.means.iter().zip(&b.means) {
            assert!((x - y).abs() < 1e-9);
        }
    }
}

#[test]
fn test_same_seed_same_result() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(dir.path(), &student_rows(300, 5));
    let config = config_for(dir.path(), &input);

    let first = run(&config, &mut RecordingBackend::default()).unwrap();
    let second = run(&config, &mut RecordingBackend::default()).unwrap();

    assert_eq!(first.model.mse.to_bits(), second.model.mse.to_bits());
    assert_eq!(first.model.intercept.to_bits(), second.model.intercept.to_bits());
    assert_eq!(first.model.weights, second.model.weights);
}

#[test]
fn test_correlation_adds_heatmap() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(dir.path(), &student_rows(300, 6));
    let config = Config {
        correlation: true,
        ..config_for(dir.path(), &input)
    };
    let mut backend = RecordingBackend::default();

    let summary = run(&config, &mut backend).unwrap();

    assert_eq!(summary.artifacts.len(), 4);
    assert_eq!(file_names(&summary.artifacts)[3], VIZ_CORRELATION);
    let heatmap = &backend.heatmaps[0];
    assert_eq!(
        heatmap.labels,
        vec![
            "math_score",
            "reading_score",
            "writing_score",
            "gender",
            "lunch",
            "test_preparation_course"
        ]
    );
    assert_eq!(heatmap.values.len(), 36);
    assert_eq!(heatmap.annotations[0], "1.00");
}

#[test]
fn test_unknown_lunch_fails_before_any_chart() {
    let dir = TempDir::new().unwrap();
    let mut rows = student_rows(100, 7);
    rows[17].lunch = "unknown".to_string();
    let input = write_csv(dir.path(), &rows);
    let mut backend = RecordingBackend::default();

    let err = run(&config_for(dir.path(), &input), &mut backend).unwrap_err();

    match err {
        PipelineError::Processor(ProcessorError::UnmappedCategory { column, value, row }) => {
            assert_eq!(column, "lunch");
            assert_eq!(value, "unknown");
            assert_eq!(row, 17);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(backend.calls.is_empty());
}

#[test]
fn test_lenient_policy_drops_the_row_from_the_fit() {
    let dir = TempDir::new().unwrap();
    let mut rows = student_rows(200, 8);
    rows[3].lunch = "unknown".to_string();
    let input = write_csv(dir.path(), &rows);
    let config = Config {
        policy: CategoryPolicy::Lenient,
        ..config_for(dir.path(), &input)
    };

    let summary = run(&config, &mut RecordingBackend::default()).unwrap();

    assert_eq!(summary.rows, 200);
    assert_eq!(summary.model.train_rows + summary.model.test_rows, 199);
    assert_eq!(summary.artifacts.len(), 3);
}

#[test]
fn test_missing_input_is_data_unavailable() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("absent.csv");
    let mut backend = RecordingBackend::default();

    let err = run(&config_for(dir.path(), &input), &mut backend).unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Loader(LoaderError::DataUnavailable { ref path, .. }) if path == &input
    ));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_invalid_config_is_rejected_up_front() {
    let dir = TempDir::new().unwrap();
    let mut config = config_for(dir.path(), &dir.path().join("absent.csv"));
    config.split.test_fraction = 1.0;

    let err = run(&config, &mut RecordingBackend::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Config(ConfigError::TestSize(_))));
}

#[test]
fn test_backend_failure_keeps_earlier_charts() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(dir.path(), &student_rows(120, 9));
    let mut backend = RecordingBackend::failing_on("grouped_bars");

    let err = run(&config_for(dir.path(), &input), &mut backend).unwrap_err();

    assert!(matches!(err, PipelineError::Render(RenderError::Backend(_))));
    assert_eq!(backend.kinds(), vec!["histograms"]);
    assert!(dir.path().join("out").join(VIZ_DISTRIBUTION).is_file());
    assert!(!dir.path().join("out").join(VIZ_TREND).exists());
}

#[test]
fn test_missing_education_level_still_reports() {
    let dir = TempDir::new().unwrap();
    let rows: Vec<_> = student_rows(300, 10)
        .into_iter()
        .map(|mut r| {
            if r.education == "master's degree" {
                r.education = "bachelor's degree".to_string();
            }
            r
        })
        .collect();
    let input = write_csv(dir.path(), &rows);

    let summary = run(&config_for(dir.path(), &input), &mut RecordingBackend::default()).unwrap();

    let masters = &summary.aggregate.rows[5];
    assert_eq!(masters.category, "master's degree");
    assert_eq!(masters.count, 0);
    assert!(masters.means.iter().all(|m| m.is_nan()));

    let weight = summary
        .model
        .weights
        .iter()
        .find(|w| w.feature == "parental_level_of_education_master's_degree")
        .unwrap();
    assert_eq!(weight.weight, 0.0);

    let json = serde_json::to_value(&summary).unwrap();
    assert!(json["aggregate"]["rows"][5]["means"][0].is_null());
    assert_eq!(json["model"]["weights"].as_array().unwrap().len(), 14);
}

#[test]
fn test_absent_reference_level_still_fits() {
    let dir = TempDir::new().unwrap();
    let rows: Vec<_> = student_rows(1000, 11)
        .into_iter()
        .map(|mut r| {
            if r.education == "associate's degree" {
                r.education = "high school".to_string();
            }
            if r.race == "group A" {
                r.race = "group C".to_string();
            }
            r
        })
        .collect();
    let input = write_csv(dir.path(), &rows);
    let mut backend = RecordingBackend::default();

    let summary = run(&config_for(dir.path(), &input), &mut backend).unwrap();

    assert_eq!(summary.artifacts.len(), 3);
    assert_eq!(backend.kinds()[2], "horizontal_bars");
    assert!(summary.model.mse.is_finite());
    assert_eq!(summary.aggregate.rows[3].category, "associate's degree");
    assert_eq!(summary.aggregate.rows[3].count, 0);

    let weight = |name: &str| {
        summary
            .model
            .weights
            .iter()
            .find(|w| w.feature == name)
            .map(|w| w.weight)
            .unwrap()
    };
    assert_eq!(weight("parental_level_of_education_some_high_school"), 0.0);
    assert_eq!(weight("race_ethnicity_group_E"), 0.0);
    assert_ne!(weight("lunch"), 0.0);
}
