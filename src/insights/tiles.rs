//! Tile-table analytics: grid bounds, metric distributions, hotspots, spatial
//! autocorrelation and cross-metric correlation.

use std::cmp::Ordering;
use std::path::Path;

use crate::domain::{GridInfo, Hotspot, MetricSummary, OrderedMap};
use crate::error::AppError;
use crate::io::ingest::Table;
use crate::math::corr::pearson;
use crate::math::gini::gini_of_series;
use crate::math::moran::morans_i;
use crate::math::stats::compute_stats;
use crate::schema::{discover_metric_columns, infer_tile_keys, parse_float, parse_int};

/// Metrics considered for pairwise correlation, in pair order.
pub const CORRELATION_PRIORITY: &[&str] = &[
    "land_value",
    "traffic",
    "goods_fill",
    "flood_depth",
    "ponding_depth",
    "services",
];

pub const LAND_VALUE: &str = "land_value";

/// Largest grid Moran's I is computed on.
pub const MAX_GRID_CELLS: usize = 1 << 24;
/// A grid may be at most this many times larger than the row count.
pub const GRID_FILL_FACTOR: usize = 16;

/// One discovered metric and its values in row order.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricColumn {
    pub name: &'static str,
    pub column: String,
    pub values: Vec<Option<f64>>,
}

/// A tile table resolved into coordinates and metric series.
#[derive(Debug, Clone, PartialEq)]
pub struct TileFrame {
    /// `None` for rows whose x or y did not parse.
    pub coords: Vec<Option<(i64, i64)>>,
    pub metrics: Vec<MetricColumn>,
    pub grid: GridInfo,
}

impl TileFrame {
    pub fn metric(&self, name: &str) -> Option<&MetricColumn> {
        self.metrics.iter().find(|m| m.name == name)
    }
}

/// Resolve key columns, grid bounds and metric series.
///
/// Fails when the keys cannot be inferred or no row carries usable coordinates.
pub fn resolve_tiles(table: &Table, path: &Path) -> Result<TileFrame, AppError> {
    let keys = infer_tile_keys(table).ok_or_else(|| {
        AppError::data(format!(
            "Could not infer tile key columns (x/y) in {}",
            path.display()
        ))
    })?;
    let (Some(cx), Some(cy)) = (table.column_index(&keys.x), table.column_index(&keys.y)) else {
        return Err(AppError::data(format!(
            "Could not infer tile key columns (x/y) in {}",
            path.display()
        )));
    };
    log::debug!("tile keys: x=`{}`, y=`{}`", keys.x, keys.y);

    let coords: Vec<Option<(i64, i64)>> = (0..table.len())
        .map(|row| {
            let x = parse_int(table.cell(row, cx))?;
            let y = parse_int(table.cell(row, cy))?;
            Some((x, y))
        })
        .collect();

    let max_x = coords.iter().flatten().map(|&(x, _)| x).max();
    let max_y = coords.iter().flatten().map(|&(_, y)| y).max();
    let (Some(max_x), Some(max_y)) = (max_x, max_y) else {
        return Err(AppError::data(format!(
            "{} did not contain usable x/y coordinates",
            path.display()
        )));
    };

    let bounds = max_x.checked_add(1).zip(max_y.checked_add(1));
    let Some((width, height)) = bounds else {
        return Err(AppError::data(format!(
            "{} has tile coordinates out of range",
            path.display()
        )));
    };

    let metrics = discover_metric_columns(&table.headers)
        .into_iter()
        .filter_map(|(name, column)| {
            let col = table.column_index(&column)?;
            let values = table.column_cells(col).map(parse_float).collect();
            Some(MetricColumn {
                name,
                column,
                values,
            })
        })
        .collect::<Vec<_>>();
    log::debug!(
        "discovered tile metrics: {:?}",
        metrics.iter().map(|m| m.name).collect::<Vec<_>>()
    );

    Ok(TileFrame {
        coords,
        metrics,
        grid: GridInfo {
            width,
            height,
            tiles: table.len(),
        },
    })
}

pub fn metric_summaries(frame: &TileFrame) -> OrderedMap<MetricSummary> {
    let mut out = OrderedMap::new();
    for m in &frame.metrics {
        out.insert(
            m.name,
            MetricSummary {
                column: m.column.clone(),
                stats: compute_stats(&m.values),
                gini: gini_of_series(&m.values),
            },
        );
    }
    out
}

/// Highest-valued tiles per metric; ties keep row order.
pub fn hotspots(frame: &TileFrame, top_k: usize) -> OrderedMap<Vec<Hotspot>> {
    let mut out = OrderedMap::new();
    for m in &frame.metrics {
        let mut items: Vec<Hotspot> = frame
            .coords
            .iter()
            .zip(&m.values)
            .filter_map(|(coord, value)| {
                let (x, y) = (*coord)?;
                let value = (*value)?;
                (x >= 0 && y >= 0 && value.is_finite()).then_some(Hotspot { x, y, value })
            })
            .collect();
        // `0.0` and `-0.0` tie, so they keep row order.
        items.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
        items.truncate(top_k);
        out.insert(m.name, items);
    }
    out
}

/// 4-neighbour Moran's I of `land_value` on the row-major grid.
pub fn land_value_moran(frame: &TileFrame) -> Option<f64> {
    let land = frame.metric(LAND_VALUE)?;
    let width = usize::try_from(frame.grid.width).ok()?;
    let height = usize::try_from(frame.grid.height).ok()?;
    let cells = width.checked_mul(height)?;
    if cells > MAX_GRID_CELLS || cells > frame.coords.len().saturating_mul(GRID_FILL_FACTOR) {
        log::warn!(
            "grid {width}x{height} too sparse for {} rows; Moran's I skipped",
            frame.coords.len()
        );
        return None;
    }

    let mut grid = vec![None; cells];
    for (coord, value) in frame.coords.iter().zip(&land.values) {
        let Some((x, y)) = *coord else { continue };
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            continue;
        };
        // Later rows overwrite earlier ones at the same coordinate.
        grid[y * width + x] = *value;
    }
    morans_i(&grid, width, height)
}

pub fn correlations(frame: &TileFrame) -> OrderedMap<Option<f64>> {
    let present: Vec<&MetricColumn> = CORRELATION_PRIORITY
        .iter()
        .filter_map(|name| frame.metric(name))
        .collect();

    let mut out = OrderedMap::new();
    for (i, a) in present.iter().enumerate() {
        for b in &present[i + 1..] {
            out.insert(
                format!("{}__vs__{}", a.name, b.name),
                pearson(&a.values, &b.values),
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(table: &Table) -> TileFrame {
        resolve_tiles(table, Path::new("tile_metrics.csv")).unwrap()
    }

    #[test]
    fn grid_bounds_follow_max_coordinates() {
        let t = Table::from_rows(
            &["x", "y", "land_value"],
            &[&["0", "0", "1"], &["3", "1", "2"], &["bad", "9", "3"]],
        );
        let f = frame(&t);
        assert_eq!(
            f.grid,
            GridInfo {
                width: 4,
                height: 2,
                tiles: 3
            }
        );
        assert_eq!(f.coords[2], None);
    }

    #[test]
    fn unusable_coordinates_are_fatal() {
        let t = Table::from_rows(&["x", "y", "land_value"], &[&["a", "b", "1"]]);
        let err = resolve_tiles(&t, Path::new("t.csv")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);

        let t = Table::from_rows(&["name", "kind"], &[&["road", "small"]]);
        let err = resolve_tiles(&t, Path::new("t.csv")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);
    }

    #[test]
    fn hotspots_skip_invalid_rows_and_keep_ties_stable() {
        let t = Table::from_rows(
            &["x", "y", "traffic"],
            &[
                &["0", "0", "5"],
                &["1", "0", "9"],
                &["-1", "0", "100"],
                &["2", "0", ""],
                &["0", "1", "5"],
            ],
        );
        let f = frame(&t);
        let hs = hotspots(&f, 3);
        let traffic = hs.get("traffic").unwrap();
        let order: Vec<(i64, i64)> = traffic.iter().map(|h| (h.x, h.y)).collect();
        assert_eq!(order, vec![(1, 0), (0, 0), (0, 1)]);

        assert!(hotspots(&f, 0).get("traffic").unwrap().is_empty());
    }

    #[test]
    fn moran_on_checkerboard_land_value() {
        let mut rows: Vec<Vec<String>> = Vec::new();
        for y in 0..4 {
            for x in 0..4 {
                let v = if (x + y) % 2 == 0 { "1" } else { "0" };
                rows.push(vec![x.to_string(), y.to_string(), v.to_string()]);
            }
        }
        let t = Table::new(vec!["x".into(), "y".into(), "LandValue".into()], rows);
        let f = frame(&t);
        assert_eq!(f.metric(LAND_VALUE).unwrap().column, "LandValue");
        let i = land_value_moran(&f).unwrap();
        assert!((i + 1.0).abs() < 1e-12);
    }

    #[test]
    fn huge_coordinate_is_a_data_error() {
        let t = Table::from_rows(
            &["x", "y", "land_value"],
            &[&["0", "0", "1"], &["1e30", "0", "2"]],
        );
        let err = resolve_tiles(&t, Path::new("t.csv")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);
    }

    #[test]
    fn sparse_oversized_grid_skips_moran() {
        let t = Table::from_rows(
            &["x", "y", "land_value"],
            &[
                &["0", "0", "1"],
                &["1", "0", "2"],
                &["0", "1", "3"],
                &["1000000000", "1000000000", "4"],
            ],
        );
        let f = frame(&t);
        assert_eq!(f.grid.width, 1_000_000_001);
        assert_eq!(land_value_moran(&f), None);
        // Other sections are unaffected.
        assert_eq!(hotspots(&f, 1).get("land_value").unwrap()[0].value, 4.0);
    }

    #[test]
    fn later_row_overwrites_moran_grid_cell() {
        let mut rows: Vec<Vec<String>> = vec![vec!["0".into(), "0".into(), "100".into()]];
        for y in 0..4 {
            for x in 0..4 {
                let v = if (x + y) % 2 == 0 { "1" } else { "0" };
                rows.push(vec![x.to_string(), y.to_string(), v.to_string()]);
            }
        }
        let t = Table::new(vec!["x".into(), "y".into(), "land_value".into()], rows);
        // The stray 100 at (0,0) is replaced by the checkerboard's 1.
        let i = land_value_moran(&frame(&t)).unwrap();
        assert!((i + 1.0).abs() < 1e-12);
    }

    #[test]
    fn signed_zero_hotspots_keep_row_order() {
        let t = Table::from_rows(
            &["x", "y", "traffic"],
            &[&["0", "0", "-0.0"], &["1", "0", "0.0"]],
        );
        let hs = hotspots(&frame(&t), 2);
        let traffic = hs.get("traffic").unwrap();
        assert_eq!((traffic[0].x, traffic[1].x), (0, 1));
        assert!(traffic[0].value.is_sign_negative());
    }

    #[test]
    fn moran_absent_without_land_value() {
        let t = Table::from_rows(&["x", "y", "traffic"], &[&["0", "0", "1"], &["1", "1", "2"]]);
        assert_eq!(land_value_moran(&frame(&t)), None);
    }

    #[test]
    fn correlation_pairs_follow_priority_order() {
        let t = Table::from_rows(
            &["x", "y", "services", "traffic", "land_value"],
            &[
                &["0", "0", "3", "1", "2"],
                &["1", "0", "2", "2", "4"],
                &["2", "0", "1", "3", "6"],
                &["3", "0", "0", "4", "8"],
            ],
        );
        let c = correlations(&frame(&t));
        let keys: Vec<&str> = c.keys().collect();
        assert_eq!(
            keys,
            vec![
                "land_value__vs__traffic",
                "land_value__vs__services",
                "traffic__vs__services"
            ]
        );
        assert!((c.get("land_value__vs__traffic").unwrap().unwrap() - 1.0).abs() < 1e-12);
        assert!((c.get("traffic__vs__services").unwrap().unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn metric_summaries_carry_stats_and_gini() {
        let t = Table::from_rows(
            &["x", "y", "population"],
            &[&["0", "0", "0"], &["1", "0", "0"], &["2", "0", "0"], &["3", "0", "1"]],
        );
        let m = metric_summaries(&frame(&t));
        let pop = m.get("population").unwrap();
        assert_eq!(pop.column, "population");
        assert_eq!(pop.stats.unwrap().count, 4);
        assert!((pop.gini.unwrap() - 0.75).abs() < 1e-12);
    }
}
