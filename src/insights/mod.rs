//! Single-dossier analytics.
//!
//! The tile table is required; the summary and tick table only add sections.

pub mod ticks;
pub mod tiles;

use crate::domain::{InputsInfo, InsightsReport, SpatialSummary};
use crate::error::AppError;
use crate::io::ingest::{ArtifactLoad, LoadedDossier};

pub use ticks::summarize_ticks;
pub use tiles::{CORRELATION_PRIORITY, TileFrame, resolve_tiles};

pub fn analyze(dossier: &LoadedDossier, top_k: usize) -> Result<InsightsReport, AppError> {
    let paths = &dossier.paths;
    let table = match &dossier.tiles {
        ArtifactLoad::Present(t) => t,
        ArtifactLoad::Absent | ArtifactLoad::Malformed(_) => {
            return Err(AppError::usage(format!(
                "Could not read tile_metrics.csv at: {}",
                paths.tiles.display()
            )));
        }
    };

    let frame = resolve_tiles(table, &paths.tiles)?;
    log::info!(
        "grid {}x{} ({} tiles), {} metrics",
        frame.grid.width,
        frame.grid.height,
        frame.grid.tiles,
        frame.metrics.len()
    );

    Ok(InsightsReport {
        dossier_dir: paths.dir.display().to_string(),
        inputs: InputsInfo {
            summary_json: dossier
                .summary
                .is_present()
                .then(|| paths.summary.display().to_string()),
            ticks_csv: dossier
                .ticks
                .is_present()
                .then(|| paths.ticks.display().to_string()),
            tile_metrics_csv: paths.tiles.display().to_string(),
        },
        grid: frame.grid,
        metrics: tiles::metric_summaries(&frame),
        hotspots: tiles::hotspots(&frame, top_k),
        spatial: SpatialSummary {
            morans_i_land_value_4nbr: tiles::land_value_moran(&frame),
        },
        correlations: tiles::correlations(&frame),
        ticks: dossier.ticks.present().and_then(summarize_ticks),
        summary: dossier
            .summary
            .present()
            .map(|s| serde_json::Value::Object(s.clone())),
    })
}
