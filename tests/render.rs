//! Full runs through the plotters renderer at a low resolution.

mod common;

use common::{student_rows, write_csv};
use score_insight::charts::{StaticChartRenderer, VIZ_CORRELATION, VIZ_DISTRIBUTION, VIZ_MODEL, VIZ_TREND};
use score_insight::config::Config;
use score_insight::run;
use tempfile::TempDir;

#[test]
fn test_static_renderer_writes_every_png() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(dir.path(), &student_rows(300, 21));
    let config = Config {
        input,
        output_dir: dir.path().join("charts"),
        dpi: 50,
        correlation: true,
        ..Config::default()
    };
    let mut renderer = StaticChartRenderer::new(config.dpi);

    let summary = run(&config, &mut renderer).unwrap();

    assert_eq!(summary.artifacts.len(), 4);
    for name in [VIZ_DISTRIBUTION, VIZ_TREND, VIZ_MODEL, VIZ_CORRELATION] {
        let path = config.output_dir.join(name);
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.len() > 1000, "{name} is only {} bytes", bytes.len());
        assert_eq!(&bytes[1..4], b"PNG");
    }
}

#[test]
fn test_static_renderer_overwrites_existing_files() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(dir.path(), &student_rows(150, 22));
    let output_dir = dir.path().join("charts");
    std::fs::create_dir_all(&output_dir).unwrap();
    std::fs::write(output_dir.join(VIZ_TREND), b"stale").unwrap();
    let config = Config {
        input,
        output_dir: output_dir.clone(),
        dpi: 40,
        ..Config::default()
    };

    run(&config, &mut StaticChartRenderer::new(config.dpi)).unwrap();

    let bytes = std::fs::read(output_dir.join(VIZ_TREND)).unwrap();
    assert_ne!(bytes, b"stale");
    assert_eq!(&bytes[1..4], b"PNG");
}
