//! Heuristic schema discovery.
//!
//! Nothing about a dossier table is declared up front. Numeric columns are found by
//! parsing their values, and semantic roles (tile coordinates, land value, day, ...)
//! are found by matching headers against ordered candidate lists.

use crate::io::ingest::Table;
use crate::schema::parse::{parse_float, parse_int};

/// Tick tables carry noisier derived metrics, so a looser threshold.
pub const TICK_NUMERIC_THRESHOLD: f64 = 0.75;
/// Tile tables must not let structural columns leak in.
pub const TILE_NUMERIC_THRESHOLD: f64 = 0.90;

pub const X_CANDIDATES: &[&str] = &["x", "tile_x", "ix", "col", "tx"];
pub const Y_CANDIDATES: &[&str] = &["y", "tile_y", "iy", "row", "ty"];
pub const DAY_CANDIDATES: &[&str] = &["day", "tick", "t"];

/// Canonical tile metric name -> header candidates, in priority order.
pub const METRIC_CATALOG: &[(&str, &[&str])] = &[
    (
        "land_value",
        &["landvalue", "land_value", "landValue", "land_value_norm", "landvalue_norm"],
    ),
    (
        "traffic",
        &["traffic", "traffic_flow", "commute_traffic", "traffic_util", "congestion"],
    ),
    (
        "goods_fill",
        &["goods_fill", "goodsfill", "goods", "goods_pressure", "goods_util"],
    ),
    ("flood_depth", &["flood_depth", "flooddepth", "sea_depth", "flood"]),
    ("ponding_depth", &["ponding_depth", "pondingdepth", "pond_depth", "ponding"]),
    (
        "services",
        &["services", "service", "service_sat", "services_sat", "satisfaction_services"],
    ),
    ("happiness", &["happiness", "happy"]),
    ("population", &["population", "pop", "residents"]),
    ("jobs", &["jobs", "employment"]),
];

/// Tick series shown in the insights time-series section.
pub const TICK_SERIES_CATALOG: &[(&str, &[&str])] = &[
    ("population", &["population", "pop", "residents"]),
    ("jobs", &["jobs"]),
    ("money", &["money", "cash", "funds"]),
    ("happiness", &["happiness", "happy"]),
];

/// Inferred coordinate columns of a tile table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileKeys {
    pub x: String,
    pub y: String,
}

/// Columns where at least `threshold` of the non-empty cells parse as finite floats.
pub fn numeric_columns(table: &Table, threshold: f64) -> Vec<String> {
    if table.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    for (col, name) in table.headers.iter().enumerate() {
        let mut seen = 0usize;
        let mut valid = 0usize;
        for cell in table.column_cells(col) {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            seen += 1;
            if parse_float(cell).is_some() {
                valid += 1;
            }
        }
        if seen > 0 && (valid as f64 / seen as f64) >= threshold {
            out.push(name.clone());
        }
    }
    out
}

/// Pick the header matching the first candidate that matches at all.
///
/// Pass 1 compares lower-cased names; pass 2 also strips non-alphanumerics
/// (`Land Value` matches `land_value`). The header is returned as written.
pub fn choose_column(headers: &[String], candidates: &[&str]) -> Option<String> {
    let by_lower = |c: &str| {
        let c = c.to_lowercase();
        headers.iter().find(|h| h.to_lowercase() == c)
    };
    if let Some(h) = candidates.iter().find_map(|c| by_lower(*c)) {
        return Some(h.clone());
    }

    let by_norm = |c: &str| {
        let c = normalize_name(c);
        headers.iter().find(|h| normalize_name(h) == c)
    };
    candidates.iter().find_map(|c| by_norm(*c)).cloned()
}

/// Lower-case and keep only alphanumeric characters.
pub fn normalize_name(s: &str) -> String {
    s.chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Infer the x/y coordinate columns of a tile table.
///
/// Falls back to the first two columns whose value in the first data row is an
/// integer when no named match exists for either role.
pub fn infer_tile_keys(table: &Table) -> Option<TileKeys> {
    let x = choose_column(&table.headers, X_CANDIDATES);
    let y = choose_column(&table.headers, Y_CANDIDATES);
    if let (Some(x), Some(y)) = (x, y) {
        return Some(TileKeys { x, y });
    }

    if table.is_empty() {
        return None;
    }
    let mut intish = table
        .headers
        .iter()
        .enumerate()
        .filter(|(col, _)| parse_int(table.cell(0, *col)).is_some())
        .map(|(_, h)| h.clone());
    let x = intish.next()?;
    let y = intish.next()?;
    log::debug!("tile keys inferred positionally: x={x}, y={y}");
    Some(TileKeys { x, y })
}

/// Resolve every entry of `catalog` present in `headers` as `(canonical, header)`.
pub fn discover_columns(
    headers: &[String],
    catalog: &[(&'static str, &[&str])],
) -> Vec<(&'static str, String)> {
    catalog
        .iter()
        .filter_map(|(name, candidates)| choose_column(headers, candidates).map(|col| (*name, col)))
        .collect()
}

/// Semantic tile metrics present in `headers`.
pub fn discover_metric_columns(headers: &[String]) -> Vec<(&'static str, String)> {
    discover_columns(headers, METRIC_CATALOG)
}
