//! Synthetic dossier generation.
//!
//! Produces a small, fully deterministic dossier (same seed, same bytes) with the
//! artifact layout the analytics tools expect. Land value is a smooth radial field
//! plus Gaussian noise, so it is spatially clustered (positive Moran's I).

use std::collections::hash_map::DefaultHasher;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::path::Path;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::SampleConfig;
use crate::error::AppError;
use crate::io::ingest::{SUMMARY_FILE, Summary, TICKS_FILE, TILES_FILE};

pub const SAMPLE_TOOL: &str = "dossier sample";

/// Peak land value at the grid centre.
const LAND_VALUE_PEAK: f64 = 100.0;
const LAND_VALUE_NOISE_SD: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickRow {
    pub day: i64,
    pub population: i64,
    pub jobs: i64,
    pub money: f64,
    pub happiness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileRow {
    pub x: usize,
    pub y: usize,
    pub land_value: f64,
    pub traffic: f64,
    pub goods_fill: f64,
    pub flood_depth: f64,
    pub services: f64,
    pub district: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleDossier {
    pub summary: Summary,
    pub ticks: Vec<TickRow>,
    pub tiles: Vec<TileRow>,
}

pub fn generate_dossier(config: &SampleConfig) -> Result<SampleDossier, AppError> {
    if config.width == 0 || config.height == 0 {
        return Err(AppError::usage("Sample width and height must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let unit = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(crate::error::EXIT_DATA, format!("Noise distribution error: {e}")))?;

    let tiles = generate_tiles(&mut rng, &unit, config.width, config.height);
    let ticks = generate_ticks(&mut rng, &unit, config.days);

    let mut summary = Summary::new();
    summary.insert("seed".to_string(), json!(config.seed));
    summary.insert("width".to_string(), json!(config.width));
    summary.insert("height".to_string(), json!(config.height));
    summary.insert("days".to_string(), json!(config.days));
    summary.insert("hash".to_string(), Value::String(content_hash(config, &tiles)));
    summary.insert("tool".to_string(), Value::String(SAMPLE_TOOL.to_string()));

    log::info!(
        "generated sample dossier: {}x{} tiles, {} days (seed {})",
        config.width,
        config.height,
        config.days,
        config.seed
    );

    Ok(SampleDossier {
        summary,
        ticks,
        tiles,
    })
}

fn generate_tiles(rng: &mut StdRng, unit: &Normal<f64>, width: usize, height: usize) -> Vec<TileRow> {
    let cx = (width as f64 - 1.0) / 2.0;
    let cy = (height as f64 - 1.0) / 2.0;
    let max_dist = (cx * cx + cy * cy).sqrt().max(1.0);

    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let closeness = 1.0 - (dx * dx + dy * dy).sqrt() / max_dist;

            let land_value =
                (LAND_VALUE_PEAK * closeness + LAND_VALUE_NOISE_SD * unit.sample(rng)).max(0.0);
            let traffic = (0.6 * land_value + 10.0 * unit.sample(rng).abs()).max(0.0);
            let goods_fill: f64 = rng.gen_range(0.0..=1.0);
            // Low-lying western edge floods.
            let flood_depth = if x < width.div_ceil(8) {
                (0.5 + 0.2 * unit.sample(rng)).max(0.0)
            } else {
                0.0
            };
            let services = (0.4 + 0.5 * closeness + 0.05 * unit.sample(rng)).clamp(0.0, 1.0);
            let district = (2 * y / height * 2 + 2 * x / width) as u8;

            out.push(TileRow {
                x,
                y,
                land_value,
                traffic,
                goods_fill,
                flood_depth,
                services,
                district,
            });
        }
    }
    out
}

fn generate_ticks(rng: &mut StdRng, unit: &Normal<f64>, days: usize) -> Vec<TickRow> {
    let mut out = Vec::with_capacity(days);
    let mut money = 10_000.0;
    for i in 0..days {
        let day = i as i64 + 1;
        let population = 1_000 + 40 * day + (25.0 * unit.sample(rng)).round() as i64;
        let jobs = (population as f64 * 0.6).round() as i64;
        money += 150.0 + 400.0 * unit.sample(rng);
        let happiness = (0.6 + 0.1 * (day as f64 / 7.0).sin() + 0.02 * unit.sample(rng)).clamp(0.0, 1.0);
        out.push(TickRow {
            day,
            population: population.max(0),
            jobs: jobs.max(0),
            money,
            happiness,
        });
    }
    out
}

fn content_hash(config: &SampleConfig, tiles: &[TileRow]) -> String {
    let mut hasher = DefaultHasher::new();
    config.seed.hash(&mut hasher);
    config.width.hash(&mut hasher);
    config.height.hash(&mut hasher);
    config.days.hash(&mut hasher);
    for t in tiles {
        t.land_value.to_bits().hash(&mut hasher);
    }
    format!("{:016x}", hasher.finish())
}

/// Write `summary.json`, `ticks.csv` and `tile_metrics.csv` into `dir`.
pub fn write_dossier(dir: &Path, dossier: &SampleDossier) -> Result<(), AppError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| AppError::output(format!("Failed to create '{}': {e}", dir.display())))?;

    let summary_path = dir.join(SUMMARY_FILE);
    let file = File::create(&summary_path)
        .map_err(|e| AppError::output(format!("Failed to create '{}': {e}", summary_path.display())))?;
    serde_json::to_writer_pretty(file, &dossier.summary)
        .map_err(|e| AppError::output(format!("Failed to write '{}': {e}", summary_path.display())))?;

    write_csv(&dir.join(TICKS_FILE), &dossier.ticks)?;
    write_csv(&dir.join(TILES_FILE), &dossier.tiles)?;
    Ok(())
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), AppError> {
    let map_err = |e: csv::Error| AppError::output(format!("Failed to write '{}': {e}", path.display()));

    let mut writer = csv::Writer::from_path(path).map_err(map_err)?;
    for row in rows {
        writer.serialize(row).map_err(map_err)?;
    }
    writer
        .flush()
        .map_err(|e| AppError::output(format!("Failed to write '{}': {e}", path.display())))?;
    Ok(())
}
