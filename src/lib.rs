//! Score Insight
//!
//! Exploratory analysis of a student exam-score CSV: column normalization and
//! categorical encoding, grouped means, a seeded linear model and static PNG charts.

pub mod charts;
pub mod cli;
pub mod config;
pub mod data;
pub mod model;
pub mod pipeline;
pub mod stats;

pub use config::Config;
pub use pipeline::{run, PipelineError, RunSummary};
