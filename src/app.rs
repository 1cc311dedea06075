//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initializes logging
//! - parses CLI arguments into resolved configs
//! - runs the insights / compare / sample workflows
//! - writes JSON and Markdown reports

use clap::Parser;

use crate::cli::{Command, CompareArgs, InsightsArgs, SampleArgs};
use crate::domain::{CompareConfig, InsightsConfig, SampleConfig};
use crate::error::AppError;
use crate::io::export::{write_json_report, write_markdown};
use crate::report::{format_compare_markdown, format_insights_markdown};

pub mod pipeline;

/// Entry point for the `dossier` binary.
pub fn run() -> Result<(), AppError> {
    // Optional: `.env` may carry DOSSIER_TOP / DOSSIER_TOPK / RUST_LOG.
    dotenvy::dotenv().ok();
    init_logging();

    let cli = crate::cli::Cli::parse();
    match cli.command {
        Command::Insights(args) => handle_insights(args),
        Command::Compare(args) => handle_compare(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn init_logging() {
    // Ignore the error when a logger is already installed (tests).
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).try_init();
}

fn handle_insights(args: InsightsArgs) -> Result<(), AppError> {
    let config = insights_config_from_args(&args);
    let run = pipeline::run_insights(&config)?;

    write_json_report(&config.out_json, &run.report)?;
    let md = format_insights_markdown(&run.report, config.top_k, &generated_at());
    write_markdown(&config.out_md, &md)?;

    println!("Wrote: {}", config.out_json.display());
    println!("Wrote: {}", config.out_md.display());
    Ok(())
}

fn handle_compare(args: CompareArgs) -> Result<(), AppError> {
    let config = compare_config_from_args(&args);
    let run = pipeline::run_compare(&config)?;

    write_json_report(&config.out_json, &run.report)?;
    let md = format_compare_markdown(
        &run.report,
        config.top_n,
        &config.focus_metrics,
        &generated_at(),
    );
    write_markdown(&config.out_md, &md)?;

    println!("Wrote: {}", config.out_json.display());
    println!("Wrote: {}", config.out_md.display());
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = sample_config_from_args(&args);
    pipeline::run_sample(&config)?;
    println!("Wrote: {}", config.out_dir.display());
    Ok(())
}

fn generated_at() -> String {
    chrono::Local::now().to_rfc3339()
}

pub fn insights_config_from_args(args: &InsightsArgs) -> InsightsConfig {
    InsightsConfig {
        dossier_dir: args.dossier_dir.clone(),
        summary_path: args.summary.clone(),
        ticks_path: args.ticks.clone(),
        tiles_path: args.tiles.clone(),
        out_json: args.out.clone(),
        out_md: args.md.clone(),
        top_k: args.topk,
    }
}

pub fn compare_config_from_args(args: &CompareArgs) -> CompareConfig {
    CompareConfig {
        dossier_a: args.a.clone(),
        dossier_b: args.b.clone(),
        label_a: args.label_a.clone(),
        label_b: args.label_b.clone(),
        out_json: args.out.clone(),
        out_md: args.md.clone(),
        top_n: args.top,
        focus_metrics: normalize_focus_metrics(&args.metrics),
    }
}

pub fn sample_config_from_args(args: &SampleArgs) -> SampleConfig {
    SampleConfig {
        out_dir: args.out_dir.clone(),
        seed: args.seed,
        width: args.width,
        height: args.height,
        days: args.days,
    }
}

/// Trim names, drop blanks and repeats, keep first-seen order.
fn normalize_focus_metrics(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        if !out.iter().any(|seen| seen == name) {
            out.push(name.to_string());
        }
    }
    out
}
