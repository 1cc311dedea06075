//! Markdown rendering for compare and insights reports.
//!
//! Rendering is pure: the caller supplies the footer timestamp, so the same report
//! always renders to the same text.

use serde_json::Value;

use crate::domain::{
    CompareReport, InsightsReport, SummaryComparison, TickComparison, TileComparison, TileDeltaEntry,
};

/// Hotspots listed per metric in the insights Markdown.
const HOTSPOTS_SHOWN: usize = 10;

pub fn format_compare_markdown(
    report: &CompareReport,
    top: usize,
    focus_metrics: &[String],
    generated_at: &str,
) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "# Dossier comparison: {} vs {}\n\n",
        report.label_a, report.label_b
    ));
    out.push_str(&format!("- {}: `{}`\n", report.label_a, report.dossier_a));
    out.push_str(&format!("- {}: `{}`\n\n", report.label_b, report.dossier_b));

    out.push_str(&format_summary_section(&report.summary));
    out.push('\n');
    out.push_str(&format_ticks_section(&report.ticks, top));
    out.push('\n');
    out.push_str(&format_tiles_section(&report.tiles, top, focus_metrics));

    out.push_str(&footer(&report.tool, generated_at));
    out
}

fn format_summary_section(s: &SummaryComparison) -> String {
    let mut out = String::from("## Summary\n");
    if !(s.present_a && s.present_b) {
        out.push_str("- summary.json missing for one or both dossiers\n");
        return out;
    }

    out.push_str(&format!("- seed: {} vs {}\n", fmt_value(&s.seed_a), fmt_value(&s.seed_b)));
    out.push_str(&format!(
        "- size: {}x{} vs {}x{}\n",
        fmt_value(&s.width_a),
        fmt_value(&s.height_a),
        fmt_value(&s.width_b),
        fmt_value(&s.height_b)
    ));
    if !(s.hash_a.is_null() && s.hash_b.is_null()) {
        out.push_str(&format!(
            "- hash: `{}` vs `{}`\n",
            fmt_value(&s.hash_a),
            fmt_value(&s.hash_b)
        ));
    }
    if s.same_seed == Some(false) {
        out.push_str("- ⚠️ Seeds differ\n");
    }
    if s.same_size == Some(false) {
        out.push_str("- ⚠️ Map sizes differ\n");
    }
    out
}

fn format_ticks_section(t: &TickComparison, top: usize) -> String {
    let mut out = String::from("## Tick series (ticks.csv)\n");
    if !(t.present_a && t.present_b) {
        out.push_str("- ticks.csv missing for one or both dossiers\n");
        return out;
    }

    out.push_str(&format!(
        "- compared days: {} .. {} (n={})\n",
        fmt_int(t.day_min),
        fmt_int(t.day_max),
        t.common_days
    ));
    if t.metrics.is_empty() {
        out.push_str("- no comparable numeric metrics found\n");
        return out;
    }

    out.push_str(&format!(
        "\nTop {} metrics by |delta_last| (last common day):\n\n",
        top.min(t.metrics.len())
    ));
    out.push_str(
        "| metric | a_last | b_last | delta_last | delta_mean | rmse | max_abs_day | max_abs_delta |\n",
    );
    out.push_str("|---|---:|---:|---:|---:|---:|---:|---:|\n");
    for m in t.metrics.iter().take(top) {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
            m.metric,
            fmt_float(m.a_last),
            fmt_float(m.b_last),
            fmt_float(m.delta_last),
            fmt_float(m.delta_mean),
            fmt_float(m.rmse),
            fmt_int(m.max_abs_day),
            fmt_float(m.max_abs_delta),
        ));
    }
    out
}

fn format_tiles_section(t: &TileComparison, top: usize, focus_metrics: &[String]) -> String {
    let mut out = String::from("## Tile metrics (tile_metrics.csv)\n");
    if !(t.present_a && t.present_b) {
        out.push_str("- tile_metrics.csv missing for one or both dossiers\n");
        return out;
    }

    if let Some(note) = &t.note {
        out.push_str(&format!("- note: {note}\n"));
    }

    if t.metrics.is_empty() {
        out.push_str("- no comparable numeric metrics found\n");
    } else {
        out.push_str("\nTop metrics by |delta_mean|:\n\n");
        out.push_str("| metric | delta_mean | delta_p50 | delta_p90 | delta_p99 | gini_a | gini_b |\n");
        out.push_str("|---|---:|---:|---:|---:|---:|---:|\n");
        for m in t.metrics.iter().take(top) {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} |\n",
                m.metric,
                fmt_float(Some(m.delta_mean)),
                fmt_float(Some(m.delta_p50)),
                fmt_float(Some(m.delta_p90)),
                fmt_float(Some(m.delta_p99)),
                fmt_float(m.gini_a),
                fmt_float(m.gini_b),
            ));
        }
    }

    if focus_metrics.is_empty() {
        return out;
    }

    out.push_str("\n### Top per-tile deltas\n\n");
    for metric in focus_metrics {
        out.push_str(&format!("#### {metric}\n"));
        match t.tile_deltas.get(metric) {
            None => out.push_str("- (no data)\n"),
            Some(TileDeltaEntry::Note { note }) => out.push_str(&format!("- {note}\n")),
            Some(TileDeltaEntry::Tiles { tiles }) if tiles.is_empty() => {
                out.push_str("- (no comparable tiles)\n")
            }
            Some(TileDeltaEntry::Tiles { tiles }) => {
                out.push_str(&format!("Top {} tiles by |delta|:\n\n", tiles.len()));
                out.push_str("| x | y | a | b | delta |\n");
                out.push_str("|---:|---:|---:|---:|---:|\n");
                for d in tiles {
                    out.push_str(&format!(
                        "| {} | {} | {} | {} | {} |\n",
                        d.x,
                        d.y,
                        fmt_float(Some(d.a)),
                        fmt_float(Some(d.b)),
                        fmt_float(Some(d.delta)),
                    ));
                }
            }
        }
        out.push('\n');
    }
    out
}

pub fn format_insights_markdown(report: &InsightsReport, top_k: usize, generated_at: &str) -> String {
    let mut out = String::new();

    out.push_str("# Dossier insights\n\n");
    out.push_str(&format!("- Dossier: `{}`\n", report.dossier_dir));
    out.push_str(&format!(
        "- Grid: **{} x {}**  (tiles: {})\n",
        report.grid.width, report.grid.height, report.grid.tiles
    ));
    if let Some(i) = report.spatial.morans_i_land_value_4nbr {
        out.push_str(&format!(
            "- Moran's I (land value, 4-neighbor): **{}**  _(>0 clustered, ~0 random, <0 dispersed)_\n",
            fmt_float(Some(i))
        ));
    }

    out.push_str("\n## Metric summaries\n\n");
    if report.metrics.is_empty() {
        out.push_str("- no known metric columns found\n\n");
    }
    for (name, m) in report.metrics.iter() {
        out.push_str(&format!("### `{name}`  (column `{}`)\n", m.column));
        if let Some(s) = &m.stats {
            out.push_str(&format!("- count: {}\n", s.count));
            out.push_str(&format!(
                "- mean: {}, stdev: {}\n",
                fmt_float(Some(s.mean)),
                fmt_float(Some(s.stdev))
            ));
            out.push_str(&format!(
                "- p10/p50/p90/p99: {} / {} / {} / {}\n",
                fmt_float(Some(s.p10)),
                fmt_float(Some(s.p50)),
                fmt_float(Some(s.p90)),
                fmt_float(Some(s.p99))
            ));
            out.push_str(&format!(
                "- min/max: {} / {}\n",
                fmt_float(Some(s.min)),
                fmt_float(Some(s.max))
            ));
        }
        if let Some(g) = m.gini {
            out.push_str(&format!("- Gini: **{}**\n", fmt_float(Some(g))));
        }

        let spots = report.hotspots.get(name).map(Vec::as_slice).unwrap_or(&[]);
        if !spots.is_empty() {
            out.push_str(&format!(
                "- Top {} hotspots (x, y, value):\n",
                top_k.min(spots.len())
            ));
            for h in spots.iter().take(HOTSPOTS_SHOWN) {
                out.push_str(&format!("  - ({}, {}): {}\n", h.x, h.y, fmt_float(Some(h.value))));
            }
        }
        out.push('\n');
    }

    let mut corr: Vec<(&str, f64)> = report
        .correlations
        .iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect();
    if !report.correlations.is_empty() {
        // Strongest positive first; undefined pairs are left out.
        corr.sort_by(|a, b| b.1.total_cmp(&a.1));
        out.push_str("## Correlations (Pearson)\n\n");
        for (k, v) in corr {
            out.push_str(&format!("- `{k}`: **{}**\n", fmt_float(Some(v))));
        }
        out.push('\n');
    }

    if let Some(ticks) = report.ticks.as_ref().filter(|t| !t.series.is_empty()) {
        out.push_str("## Time series (ticks.csv)\n\n");
        if let Some(day) = &ticks.day_col {
            out.push_str(&format!("- rows: {} (day column `{day}`)\n\n", ticks.rows));
        } else {
            out.push_str(&format!("- rows: {}\n\n", ticks.rows));
        }
        for (name, s) in ticks.series.iter() {
            out.push_str(&format!("### `{name}` (column `{}`)\n", s.column));
            out.push_str(&format!("`{}`\n\n", s.spark));
            out.push_str(&format!("- start: {}\n", fmt_float(s.start)));
            out.push_str(&format!("- end: {}\n", fmt_float(s.end)));
            out.push_str(&format!("- min: {}\n", fmt_float(s.min)));
            out.push_str(&format!("- max: {}\n\n", fmt_float(s.max)));
        }
    }

    out.push_str("## Notes\n");
    out.push_str("- Column discovery is name-driven: metrics whose column is not recognized are skipped.\n");

    out.push_str(&footer("dossier_insights", generated_at));
    out
}

fn footer(tool: &str, generated_at: &str) -> String {
    format!("\n---\nGenerated by `{tool}` at {generated_at}.\n")
}

/// Four decimals; magnitudes below 1e-5 print as zero (no `-0.0000`); absent or
/// non-finite values print as an empty cell.
pub fn fmt_float(x: Option<f64>) -> String {
    match x {
        Some(v) if v.is_finite() => {
            let v = if v.abs() < 1e-5 { 0.0 } else { v };
            format!("{v:.4}")
        }
        _ => String::new(),
    }
}

fn fmt_int(x: Option<i64>) -> String {
    x.map(|v| v.to_string()).unwrap_or_default()
}

fn fmt_value(v: &Value) -> String {
    match v {
        Value::Null => "n/a".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
