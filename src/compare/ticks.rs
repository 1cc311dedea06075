//! Day-aligned comparison of two tick tables.
//!
//! Only days present in both tables are compared. Rows whose `day` cell does not
//! parse are ignored, and a repeated day keeps its last row.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{TickComparison, TickMetricDelta};
use crate::io::ingest::Table;
use crate::math::stats::{compute_stats, rmse};
use crate::schema::{TICK_NUMERIC_THRESHOLD, numeric_columns, parse_float, parse_int};

/// The tick key column; matched exactly.
pub const DAY_KEY: &str = "day";

pub fn compare_ticks(a: Option<&Table>, b: Option<&Table>) -> TickComparison {
    let mut out = TickComparison {
        present_a: a.is_some_and(|t| !t.is_empty()),
        present_b: b.is_some_and(|t| !t.is_empty()),
        ..TickComparison::default()
    };
    let (Some(a), Some(b)) = (a, b) else {
        return out;
    };
    if !(out.present_a && out.present_b) {
        return out;
    }

    let (Some(day_a), Some(day_b)) = (a.column_index(DAY_KEY), b.column_index(DAY_KEY)) else {
        log::info!("tick comparison skipped: `{DAY_KEY}` column missing on one side");
        return out;
    };

    let rows_a = day_index(a, day_a);
    let rows_b = day_index(b, day_b);
    let days: Vec<i64> = rows_a
        .keys()
        .filter(|d| rows_b.contains_key(*d))
        .copied()
        .collect();
    let (Some(&first), Some(&last)) = (days.first(), days.last()) else {
        log::info!("tick comparison skipped: no common days");
        return out;
    };
    out.common_days = days.len();
    out.day_min = Some(first);
    out.day_max = Some(last);

    let num_a: BTreeSet<String> = numeric_columns(a, TICK_NUMERIC_THRESHOLD).into_iter().collect();
    let num_b: BTreeSet<String> = numeric_columns(b, TICK_NUMERIC_THRESHOLD).into_iter().collect();

    let mut metrics = Vec::new();
    for name in num_a.intersection(&num_b).filter(|c| c.as_str() != DAY_KEY) {
        let (Some(col_a), Some(col_b)) = (a.column_index(name), b.column_index(name)) else {
            continue;
        };
        let series_a: Vec<Option<f64>> = days
            .iter()
            .map(|d| parse_float(a.cell(rows_a[d], col_a)))
            .collect();
        let series_b: Vec<Option<f64>> = days
            .iter()
            .map(|d| parse_float(b.cell(rows_b[d], col_b)))
            .collect();
        metrics.push(metric_delta(name, &days, &series_a, &series_b));
    }

    log::debug!("tick comparison: {} days, {} metrics", days.len(), metrics.len());
    sort_by_last_delta(&mut metrics);
    out.metrics = metrics;
    out
}

fn day_index(table: &Table, day_col: usize) -> BTreeMap<i64, usize> {
    let mut out = BTreeMap::new();
    for row in 0..table.len() {
        if let Some(day) = parse_int(table.cell(row, day_col)) {
            out.insert(day, row);
        }
    }
    out
}

fn metric_delta(
    name: &str,
    days: &[i64],
    series_a: &[Option<f64>],
    series_b: &[Option<f64>],
) -> TickMetricDelta {
    // Largest |B − A|; the earliest day wins ties.
    let mut max_abs: Option<(f64, i64, f64)> = None;
    for ((day, va), vb) in days.iter().zip(series_a).zip(series_b) {
        let (Some(va), Some(vb)) = (va, vb) else { continue };
        let delta = vb - va;
        if max_abs.is_none_or(|(best, _, _)| delta.abs() > best) {
            max_abs = Some((delta.abs(), *day, delta));
        }
    }

    let a_last = series_a.last().copied().flatten();
    let b_last = series_b.last().copied().flatten();
    let a_stats = compute_stats(series_a);
    let b_stats = compute_stats(series_b);
    let a_mean = a_stats.map(|s| s.mean);
    let b_mean = b_stats.map(|s| s.mean);

    TickMetricDelta {
        metric: name.to_string(),
        a_last,
        b_last,
        delta_last: a_last.zip(b_last).map(|(a, b)| b - a),
        a_mean,
        b_mean,
        delta_mean: a_mean.zip(b_mean).map(|(a, b)| b - a),
        rmse: rmse(series_a, series_b),
        max_abs_day: max_abs.map(|(_, day, _)| day),
        max_abs_delta: max_abs.map(|(_, _, delta)| delta),
        a_stats,
        b_stats,
    }
}

/// Stable sort, descending by `|delta_last|`; a missing delta ranks as −1.
fn sort_by_last_delta(metrics: &mut [TickMetricDelta]) {
    let key = |m: &TickMetricDelta| m.delta_last.map_or(-1.0, f64::abs);
    metrics.sort_by(|x, y| key(y).total_cmp(&key(x)));
}
