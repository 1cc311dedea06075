//! Two-dossier regression comparison.
//!
//! - `summary`: run identity (seed, size, hash)
//! - `ticks`: day-aligned time-series deltas
//! - `tiles`: tile metric distribution deltas and per-tile drill-down

pub mod summary;
pub mod ticks;
pub mod tiles;

pub use summary::compare_summary;
pub use ticks::compare_ticks;
pub use tiles::compare_tiles;

use crate::domain::{CompareConfig, CompareReport};
use crate::io::ingest::LoadedDossier;

pub const TOOL_NAME: &str = "dossier_compare";

/// Compare two loaded dossiers. Never fails: missing data becomes notes and empty
/// sections.
pub fn compare_dossiers(a: &LoadedDossier, b: &LoadedDossier, config: &CompareConfig) -> CompareReport {
    let summary = compare_summary(a.summary.present(), b.summary.present());
    let ticks = compare_ticks(a.ticks.present(), b.ticks.present());
    let tiles = compare_tiles(
        a.tiles.present(),
        b.tiles.present(),
        &config.focus_metrics,
        config.top_n,
    );

    CompareReport {
        tool: TOOL_NAME.to_string(),
        dossier_a: display_dir(a),
        dossier_b: display_dir(b),
        label_a: config.label_a.clone(),
        label_b: config.label_b.clone(),
        summary,
        ticks,
        tiles,
    }
}

/// Absolute path when it resolves, otherwise as given.
fn display_dir(d: &LoadedDossier) -> String {
    std::fs::canonicalize(&d.paths.dir)
        .unwrap_or_else(|_| d.paths.dir.clone())
        .display()
        .to_string()
}
