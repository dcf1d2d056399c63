//! Score Insight - student exam-score analysis with static charts

use anyhow::{Context, Result};
use clap::Parser;
use score_insight::charts::StaticChartRenderer;
use score_insight::cli::{Cli, OutputFormat};
use tracing_subscriber::EnvFilter;

/// Initialize the stderr subscriber; `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.into_config();
    let mut renderer = StaticChartRenderer::new(config.dpi);
    let summary = score_insight::run(&config, &mut renderer)
        .with_context(|| format!("analysis of {} failed", config.input.display()))?;

    match config.format {
        OutputFormat::Text => {
            println!("Model MSE: {}", summary.model.mse);
            println!("Plots saved as {}", summary.artifact_names());
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)
                .context("failed to serialize run summary")?;
            println!("{json}");
        }
    }

    Ok(())
}
