//! Command-line parsing for the dossier tools.
//!
//! Argument parsing stays separate from the analytics code; `app` turns parsed
//! arguments into resolved config structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::DEFAULT_TOP;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "dossier",
    version,
    about = "Analytics and regression comparison for tile-grid simulation dossiers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze one dossier: metric stats, Gini, hotspots, Moran's I, correlations.
    Insights(InsightsArgs),
    /// Compare two dossiers (A = baseline, B = candidate) and report deltas.
    Compare(CompareArgs),
    /// Write a deterministic synthetic dossier.
    Sample(SampleArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct InsightsArgs {
    /// Dossier directory (summary.json, ticks.csv, tile_metrics.csv).
    pub dossier_dir: PathBuf,

    /// Override path to summary.json.
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,

    /// Override path to ticks.csv.
    #[arg(long, value_name = "PATH")]
    pub ticks: Option<PathBuf>,

    /// Override path to tile_metrics.csv.
    #[arg(long, value_name = "PATH")]
    pub tiles: Option<PathBuf>,

    /// Output JSON path.
    #[arg(long, default_value = "insights.json")]
    pub out: PathBuf,

    /// Output Markdown path.
    #[arg(long, default_value = "insights.md")]
    pub md: PathBuf,

    /// Hotspots reported per metric.
    #[arg(long, env = "DOSSIER_TOPK", default_value_t = DEFAULT_TOP)]
    pub topk: usize,
}

#[derive(Debug, Parser, Clone)]
pub struct CompareArgs {
    /// Dossier directory A (baseline).
    pub a: PathBuf,

    /// Dossier directory B (candidate).
    pub b: PathBuf,

    /// Label for dossier A.
    #[arg(long, default_value = "A")]
    pub label_a: String,

    /// Label for dossier B.
    #[arg(long, default_value = "B")]
    pub label_b: String,

    /// Output JSON path.
    #[arg(long, default_value = "compare.json")]
    pub out: PathBuf,

    /// Output Markdown path.
    #[arg(long, default_value = "compare.md")]
    pub md: PathBuf,

    /// How many top metrics/tiles to include in reports.
    #[arg(long, env = "DOSSIER_TOP", default_value_t = DEFAULT_TOP)]
    pub top: usize,

    /// Metric to compute top per-tile deltas for (repeatable).
    #[arg(long = "metric", value_name = "NAME")]
    pub metrics: Vec<String>,
}

#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Directory to write the dossier into.
    pub out_dir: PathBuf,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Grid width (tiles).
    #[arg(long, default_value_t = 32)]
    pub width: usize,

    /// Grid height (tiles).
    #[arg(long, default_value_t = 32)]
    pub height: usize,

    /// Number of tick rows.
    #[arg(long, default_value_t = 60)]
    pub days: usize,
}
