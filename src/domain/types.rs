//! Shared domain types.
//!
//! Result types are plain serializable records: they are what the JSON reports
//! contain and what the Markdown renderer reads. Configuration types are resolved from
//! CLI flags (plus environment defaults) before any work starts.

use std::path::PathBuf;

use serde::ser::{Serialize, Serializer};
use serde_json::Value;

pub use crate::math::stats::MetricStats;

/// Default number of ranked rows (metrics, tiles, hotspots) in reports.
pub const DEFAULT_TOP: usize = 20;

/// A string-keyed map that serializes in insertion order.
///
/// Report sections such as correlations and per-tile deltas are ordered by how they
/// were requested or discovered, and the JSON output keeps that order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`, keeping its original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

// -----------------------------
// Configuration
// -----------------------------

/// Resolved configuration for `dossier insights`.
#[derive(Debug, Clone)]
pub struct InsightsConfig {
    pub dossier_dir: PathBuf,
    pub summary_path: Option<PathBuf>,
    pub ticks_path: Option<PathBuf>,
    pub tiles_path: Option<PathBuf>,
    pub out_json: PathBuf,
    pub out_md: PathBuf,
    /// Hotspots reported per metric.
    pub top_k: usize,
}

/// Resolved configuration for `dossier compare`.
#[derive(Debug, Clone)]
pub struct CompareConfig {
    pub dossier_a: PathBuf,
    pub dossier_b: PathBuf,
    pub label_a: String,
    pub label_b: String,
    pub out_json: PathBuf,
    pub out_md: PathBuf,
    /// Ranked metrics shown in Markdown and per-tile deltas kept per focus metric.
    pub top_n: usize,
    /// Metrics to drill down into per tile.
    pub focus_metrics: Vec<String>,
}

/// Resolved configuration for `dossier sample`.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub out_dir: PathBuf,
    pub seed: u64,
    pub width: usize,
    pub height: usize,
    pub days: usize,
}

// -----------------------------
// Comparison results
// -----------------------------

/// Side-by-side view of the two `summary.json` records.
///
/// Identity fields are kept as raw JSON values: exporters have written seeds as
/// numbers and as strings, and equality is judged on the value as written.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SummaryComparison {
    pub present_a: bool,
    pub present_b: bool,
    /// `None` unless both summaries are present.
    pub same_seed: Option<bool>,
    pub same_size: Option<bool>,
    pub seed_a: Value,
    pub seed_b: Value,
    pub width_a: Value,
    pub width_b: Value,
    pub height_a: Value,
    pub height_b: Value,
    pub hash_a: Value,
    pub hash_b: Value,
    pub tool_a: Value,
    pub tool_b: Value,
}

/// Day-aligned difference for one tick metric.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TickMetricDelta {
    pub metric: String,
    pub a_last: Option<f64>,
    pub b_last: Option<f64>,
    pub delta_last: Option<f64>,
    pub a_mean: Option<f64>,
    pub b_mean: Option<f64>,
    pub delta_mean: Option<f64>,
    pub rmse: Option<f64>,
    pub max_abs_day: Option<i64>,
    pub max_abs_delta: Option<f64>,
    /// Statistics of the day-aligned series.
    pub a_stats: Option<MetricStats>,
    pub b_stats: Option<MetricStats>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct TickComparison {
    pub present_a: bool,
    pub present_b: bool,
    pub common_days: usize,
    pub day_min: Option<i64>,
    pub day_max: Option<i64>,
    /// Sorted by `|delta_last|`, descending; metrics without a last delta go last.
    pub metrics: Vec<TickMetricDelta>,
}

/// Distribution-level difference for one tile metric (B − A).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TileMetricDelta {
    pub metric: String,
    pub a: MetricStats,
    pub b: MetricStats,
    pub delta_mean: f64,
    pub delta_p50: f64,
    pub delta_p90: f64,
    pub delta_p99: f64,
    pub gini_a: Option<f64>,
    pub gini_b: Option<f64>,
}

/// One tile's change for a focus metric.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TileDelta {
    pub x: i64,
    pub y: i64,
    pub a: f64,
    pub b: f64,
    pub delta: f64,
}

/// Per-tile drill-down for one focus metric.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum TileDeltaEntry {
    Note { note: String },
    Tiles { tiles: Vec<TileDelta> },
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct TileComparison {
    pub present_a: bool,
    pub present_b: bool,
    /// Sorted by `|delta_mean|`, descending.
    pub metrics: Vec<TileMetricDelta>,
    pub tile_deltas: OrderedMap<TileDeltaEntry>,
    pub note: Option<String>,
}

/// Complete two-dossier comparison.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CompareReport {
    pub tool: String,
    pub dossier_a: String,
    pub dossier_b: String,
    pub label_a: String,
    pub label_b: String,
    pub summary: SummaryComparison,
    pub ticks: TickComparison,
    pub tiles: TileComparison,
}

// -----------------------------
// Single-dossier insights
// -----------------------------

/// Which artifact files fed the report.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct InputsInfo {
    pub summary_json: Option<String>,
    pub ticks_csv: Option<String>,
    pub tile_metrics_csv: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct GridInfo {
    pub width: i64,
    pub height: i64,
    pub tiles: usize,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MetricSummary {
    /// Header the metric was read from.
    pub column: String,
    pub stats: Option<MetricStats>,
    pub gini: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Hotspot {
    pub x: i64,
    pub y: i64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct SpatialSummary {
    pub morans_i_land_value_4nbr: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SeriesSummary {
    pub column: String,
    pub spark: String,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct TickSummary {
    pub rows: usize,
    pub day_col: Option<String>,
    pub series: OrderedMap<SeriesSummary>,
}

/// Complete single-dossier analysis.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct InsightsReport {
    pub dossier_dir: String,
    pub inputs: InputsInfo,
    pub grid: GridInfo,
    /// Keyed by canonical metric name, in catalog order.
    pub metrics: OrderedMap<MetricSummary>,
    pub hotspots: OrderedMap<Vec<Hotspot>>,
    pub spatial: SpatialSummary,
    /// Keyed `"{a}__vs__{b}"`.
    pub correlations: OrderedMap<Option<f64>>,
    /// `None` when no tick rows were available.
    pub ticks: Option<TickSummary>,
    /// `summary.json` passed through unchanged.
    pub summary: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_map_serializes_in_insertion_order() {
        let mut m = OrderedMap::new();
        m.insert("zeta", 1);
        m.insert("alpha", 2);
        m.insert("zeta", 3);
        assert_eq!(m.len(), 2);
        assert_eq!(serde_json::to_string(&m).unwrap(), r#"{"zeta":3,"alpha":2}"#);
    }

    #[test]
    fn tile_delta_entry_is_untagged() {
        let note = TileDeltaEntry::Note {
            note: "metric not present in both dossiers".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&note).unwrap(),
            serde_json::json!({"note": "metric not present in both dossiers"})
        );
        let tiles = TileDeltaEntry::Tiles { tiles: vec![] };
        assert_eq!(
            serde_json::to_value(&tiles).unwrap(),
            serde_json::json!({"tiles": []})
        );
    }
}
