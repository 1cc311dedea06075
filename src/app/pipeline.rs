//! Shared workflows behind the subcommands.
//!
//! load artifacts -> analyze or compare -> report structs
//!
//! Nothing here writes files or prints, so integration tests can drive the same
//! workflow the binary runs.

use crate::compare::compare_dossiers;
use crate::data::{SampleDossier, generate_dossier, write_dossier};
use crate::domain::{CompareConfig, CompareReport, InsightsConfig, InsightsReport, SampleConfig};
use crate::error::AppError;
use crate::insights::analyze;
use crate::io::ingest::{DossierPaths, LoadedDossier, load_dossier};

/// Outputs of one `dossier insights` run.
#[derive(Debug, Clone)]
pub struct InsightsRun {
    pub dossier: LoadedDossier,
    pub report: InsightsReport,
}

/// Outputs of one `dossier compare` run.
#[derive(Debug, Clone)]
pub struct CompareRun {
    pub a: LoadedDossier,
    pub b: LoadedDossier,
    pub report: CompareReport,
}

pub fn run_insights(config: &InsightsConfig) -> Result<InsightsRun, AppError> {
    if !config.dossier_dir.exists() {
        return Err(AppError::usage(format!(
            "dossier_dir does not exist: {}",
            config.dossier_dir.display()
        )));
    }

    let paths = DossierPaths::new(&config.dossier_dir).with_overrides(
        config.summary_path.as_deref(),
        config.ticks_path.as_deref(),
        config.tiles_path.as_deref(),
    );
    let dossier = load_dossier(paths);
    let report = analyze(&dossier, config.top_k)?;

    Ok(InsightsRun { dossier, report })
}

/// Compare two dossiers. Missing artifacts only empty their sections.
pub fn run_compare(config: &CompareConfig) -> Result<CompareRun, AppError> {
    for dir in [&config.dossier_a, &config.dossier_b] {
        if !dir.is_dir() {
            log::warn!("dossier directory not found: {}", dir.display());
        }
    }

    let a = load_dossier(DossierPaths::new(&config.dossier_a));
    let b = load_dossier(DossierPaths::new(&config.dossier_b));
    let report = compare_dossiers(&a, &b, config);
    log::info!(
        "compared {} tick metrics and {} tile metrics",
        report.ticks.metrics.len(),
        report.tiles.metrics.len()
    );

    Ok(CompareRun { a, b, report })
}

/// Generate a synthetic dossier and write it to `config.out_dir`.
pub fn run_sample(config: &SampleConfig) -> Result<SampleDossier, AppError> {
    let dossier = generate_dossier(config)?;
    write_dossier(&config.out_dir, &dossier)?;
    Ok(dossier)
}
