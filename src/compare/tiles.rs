//! Tile-table comparison.
//!
//! Metric distributions are compared marginally: each side's statistics are taken
//! over all of its rows, so the two grids need not line up. Per-tile deltas for
//! explicitly requested focus metrics do need shared `(x, y)` keys and only use
//! coordinates present on both sides.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{TileComparison, TileDelta, TileDeltaEntry, TileMetricDelta};
use crate::io::ingest::Table;
use crate::math::gini::gini_of_series;
use crate::math::stats::compute_stats;
use crate::schema::{TILE_NUMERIC_THRESHOLD, TileKeys, infer_tile_keys, numeric_columns, parse_float, parse_int};

/// Categorical or structural columns that look numeric but are not metrics.
pub const EXCLUDED_TILE_COLUMNS: &[&str] = &["level", "district", "variation"];

pub const NOTE_NO_KEYS: &str = "Could not infer tile key columns (x/y)";
pub const NOTE_NO_OVERLAP: &str = "No overlapping (x,y) tiles between dossiers";
pub const NOTE_METRIC_MISSING: &str = "metric not present in both dossiers";

pub fn compare_tiles(
    a: Option<&Table>,
    b: Option<&Table>,
    focus_metrics: &[String],
    top: usize,
) -> TileComparison {
    let mut out = TileComparison {
        present_a: a.is_some_and(|t| !t.is_empty()),
        present_b: b.is_some_and(|t| !t.is_empty()),
        ..TileComparison::default()
    };
    let (Some(a), Some(b)) = (a, b) else {
        return out;
    };
    if !(out.present_a && out.present_b) {
        return out;
    }

    let (Some(keys_a), Some(keys_b)) = (infer_tile_keys(a), infer_tile_keys(b)) else {
        log::warn!("tile comparison: {NOTE_NO_KEYS}");
        out.note = Some(NOTE_NO_KEYS.to_string());
        return out;
    };

    let metrics = comparable_metrics(a, b, &keys_a, &keys_b);
    out.metrics = metrics
        .iter()
        .filter_map(|name| metric_delta(a, b, name))
        .collect();
    out.metrics
        .sort_by(|x, y| y.delta_mean.abs().total_cmp(&x.delta_mean.abs()));

    let focus: Vec<&str> = focus_metrics
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .collect();
    if focus.is_empty() {
        return out;
    }

    let index_a = coordinate_index(a, &keys_a);
    let index_b = coordinate_index(b, &keys_b);
    let common: Vec<(i64, i64)> = index_a
        .keys()
        .filter(|k| index_b.contains_key(*k))
        .copied()
        .collect();
    if common.is_empty() {
        log::warn!("tile comparison: {NOTE_NO_OVERLAP}");
        out.note = Some(NOTE_NO_OVERLAP.to_string());
        return out;
    }

    for metric in focus {
        let entry = if !metrics.contains(metric) {
            TileDeltaEntry::Note {
                note: NOTE_METRIC_MISSING.to_string(),
            }
        } else {
            let tiles = tile_deltas(a, b, metric, &common, &index_a, &index_b, top);
            TileDeltaEntry::Tiles { tiles }
        };
        out.tile_deltas.insert(metric, entry);
    }

    out
}

/// Columns numeric on both sides, minus coordinates and categorical fields.
fn comparable_metrics(a: &Table, b: &Table, keys_a: &TileKeys, keys_b: &TileKeys) -> BTreeSet<String> {
    let excluded: BTreeSet<String> = [&keys_a.x, &keys_a.y, &keys_b.x, &keys_b.y]
        .into_iter()
        .map(|k| k.to_lowercase())
        .chain(EXCLUDED_TILE_COLUMNS.iter().map(|c| c.to_string()))
        .collect();

    let num_a: BTreeSet<String> = numeric_columns(a, TILE_NUMERIC_THRESHOLD).into_iter().collect();
    let num_b: BTreeSet<String> = numeric_columns(b, TILE_NUMERIC_THRESHOLD).into_iter().collect();
    num_a
        .intersection(&num_b)
        .filter(|c| !excluded.contains(&c.to_lowercase()))
        .cloned()
        .collect()
}

fn column_series(table: &Table, name: &str) -> Vec<Option<f64>> {
    match table.column_index(name) {
        Some(col) => table.column_cells(col).map(parse_float).collect(),
        None => Vec::new(),
    }
}

fn metric_delta(a: &Table, b: &Table, name: &str) -> Option<TileMetricDelta> {
    let series_a = column_series(a, name);
    let series_b = column_series(b, name);
    let stats_a = compute_stats(&series_a)?;
    let stats_b = compute_stats(&series_b)?;
    Some(TileMetricDelta {
        metric: name.to_string(),
        a: stats_a,
        b: stats_b,
        delta_mean: stats_b.mean - stats_a.mean,
        delta_p50: stats_b.p50 - stats_a.p50,
        delta_p90: stats_b.p90 - stats_a.p90,
        delta_p99: stats_b.p99 - stats_a.p99,
        gini_a: gini_of_series(&series_a),
        gini_b: gini_of_series(&series_b),
    })
}

/// `(y, x) -> row`, so iteration is row-major. A repeated coordinate keeps its last row.
fn coordinate_index(table: &Table, keys: &TileKeys) -> BTreeMap<(i64, i64), usize> {
    let mut out = BTreeMap::new();
    let (Some(cx), Some(cy)) = (table.column_index(&keys.x), table.column_index(&keys.y)) else {
        return out;
    };
    for row in 0..table.len() {
        let x = parse_int(table.cell(row, cx));
        let y = parse_int(table.cell(row, cy));
        if let (Some(x), Some(y)) = (x, y) {
            out.insert((y, x), row);
        }
    }
    out
}

fn tile_deltas(
    a: &Table,
    b: &Table,
    metric: &str,
    common: &[(i64, i64)],
    index_a: &BTreeMap<(i64, i64), usize>,
    index_b: &BTreeMap<(i64, i64), usize>,
    top: usize,
) -> Vec<TileDelta> {
    let (Some(col_a), Some(col_b)) = (a.column_index(metric), b.column_index(metric)) else {
        return Vec::new();
    };

    let mut deltas: Vec<TileDelta> = common
        .iter()
        .filter_map(|key| {
            let va = parse_float(a.cell(index_a[key], col_a))?;
            let vb = parse_float(b.cell(index_b[key], col_b))?;
            let (y, x) = *key;
            Some(TileDelta {
                x,
                y,
                a: va,
                b: vb,
                delta: vb - va,
            })
        })
        .collect();

    deltas.sort_by(|p, q| q.delta.abs().total_cmp(&p.delta.abs()));
    deltas.truncate(top);
    deltas
}
