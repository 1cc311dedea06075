//! Integration tests for `dossier compare`.
//!
//! Dossiers are written to temporary directories and compared through the same
//! pipeline the binary uses, then the JSON and Markdown outputs are checked.

use std::fs;
use std::path::{Path, PathBuf};

use dossier_analytics::app::pipeline::run_compare;
use dossier_analytics::domain::{CompareConfig, TileDeltaEntry};
use dossier_analytics::io::export::write_json_report;
use dossier_analytics::report::format_compare_markdown;
use serde_json::Value;
use tempfile::TempDir;

fn write_dossier(root: &Path, name: &str, files: &[(&str, &str)]) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for (file, body) in files {
        fs::write(dir.join(file), body).unwrap();
    }
    dir
}

fn config(a: PathBuf, b: PathBuf, out: &Path, metrics: &[&str], top: usize) -> CompareConfig {
    CompareConfig {
        dossier_a: a,
        dossier_b: b,
        label_a: "base".to_string(),
        label_b: "cand".to_string(),
        out_json: out.join("compare.json"),
        out_md: out.join("compare.md"),
        top_n: top,
        focus_metrics: metrics.iter().map(|m| m.to_string()).collect(),
    }
}

#[test]
fn test_tile_only_dossiers_report_land_value_delta() {
    let tmp = TempDir::new().unwrap();
    let a = write_dossier(
        tmp.path(),
        "a",
        &[("tile_metrics.csv", "x,y,land_value\n0,0,10\n1,0,20\n")],
    );
    let b = write_dossier(
        tmp.path(),
        "b",
        &[("tile_metrics.csv", "x,y,land_value\n0,0,12\n1,0,20\n")],
    );
    let cfg = config(a, b, tmp.path(), &["land_value"], 20);
    let run = run_compare(&cfg).unwrap();
    let report = &run.report;

    assert!(!report.summary.present_a && !report.summary.present_b);
    assert!(!report.ticks.present_a);
    assert_eq!(report.tiles.metrics.len(), 1);
    assert!((report.tiles.metrics[0].delta_mean - 1.0).abs() < 1e-12);

    let Some(TileDeltaEntry::Tiles { tiles }) = report.tiles.tile_deltas.get("land_value") else {
        panic!("expected per-tile deltas");
    };
    assert_eq!((tiles[0].x, tiles[0].y), (0, 0));
    assert_eq!(tiles[0].delta, 2.0);

    // JSON round trip of the written report.
    write_json_report(&cfg.out_json, report).unwrap();
    let json: Value = serde_json::from_str(&fs::read_to_string(&cfg.out_json).unwrap()).unwrap();
    assert_eq!(json["tiles"]["metrics"][0]["metric"], "land_value");
    assert_eq!(json["tiles"]["tile_deltas"]["land_value"]["tiles"][0]["delta"], 2.0);
    assert_eq!(json["summary"]["same_seed"], Value::Null);
    assert_eq!(json["label_a"], "base");

    let md = format_compare_markdown(report, cfg.top_n, &cfg.focus_metrics, "now");
    assert!(md.contains("- summary.json missing for one or both dossiers"));
    assert!(md.contains("- ticks.csv missing for one or both dossiers"));
    assert!(md.contains("| 0 | 0 | 10.0000 | 12.0000 | 2.0000 |"));
}

#[test]
fn test_top_zero_gives_empty_tile_list() {
    let tmp = TempDir::new().unwrap();
    let tiles = "x,y,land_value\n0,0,10\n1,0,20\n";
    let a = write_dossier(tmp.path(), "a", &[("tile_metrics.csv", tiles)]);
    let b = write_dossier(tmp.path(), "b", &[("tile_metrics.csv", tiles)]);
    let run = run_compare(&config(a, b, tmp.path(), &["land_value"], 0)).unwrap();

    assert_eq!(
        run.report.tiles.tile_deltas.get("land_value"),
        Some(&TileDeltaEntry::Tiles { tiles: vec![] })
    );
}

#[test]
fn test_summary_identity_and_tick_alignment() {
    let tmp = TempDir::new().unwrap();
    let summary = r#"{"seed": 7, "width": 10, "height": 10, "hash": "abc"}"#;
    let a = write_dossier(
        tmp.path(),
        "a",
        &[
            ("summary.json", summary),
            ("ticks.csv", "day,population,money\n1,100,5\n2,110,6\n3,120,7\n"),
        ],
    );
    let b = write_dossier(
        tmp.path(),
        "b",
        &[
            ("summary.json", summary),
            ("ticks.csv", "day,population,money\n2,111,6\n3,125,7\n4,130,8\n"),
        ],
    );
    let run = run_compare(&config(a, b, tmp.path(), &[], 20)).unwrap();
    let report = &run.report;

    assert_eq!(report.summary.same_seed, Some(true));
    assert_eq!(report.summary.same_size, Some(true));

    assert_eq!(report.ticks.common_days, 2);
    assert_eq!((report.ticks.day_min, report.ticks.day_max), (Some(2), Some(3)));
    let names: Vec<&str> = report.ticks.metrics.iter().map(|m| m.metric.as_str()).collect();
    assert_eq!(names, vec!["population", "money"]);
    assert_eq!(report.ticks.metrics[0].delta_last, Some(5.0));

    let md = format_compare_markdown(report, 20, &[], "now");
    assert!(md.contains("- seed: 7 vs 7"));
    assert!(md.contains("- hash: `abc` vs `abc`"));
    assert!(!md.contains("Seeds differ"));
    assert!(md.contains("- tile_metrics.csv missing for one or both dossiers"));
}

#[test]
fn test_malformed_artifacts_degrade_to_absent() {
    let tmp = TempDir::new().unwrap();
    let a = write_dossier(
        tmp.path(),
        "a",
        &[("summary.json", "[1, 2, 3]"), ("tile_metrics.csv", "x,y,v\n0,0,1\n")],
    );
    let b = write_dossier(
        tmp.path(),
        "b",
        &[("summary.json", "{not json"), ("tile_metrics.csv", "x,y,v\n0,0,2\n")],
    );
    let run = run_compare(&config(a, b, tmp.path(), &["nope"], 20)).unwrap();

    assert!(!run.report.summary.present_a && !run.report.summary.present_b);
    assert_eq!(run.report.summary.same_seed, None);
    assert_eq!(run.report.tiles.metrics.len(), 1);
    assert!(matches!(
        run.report.tiles.tile_deltas.get("nope"),
        Some(TileDeltaEntry::Note { .. })
    ));
}

#[test]
fn test_missing_directories_still_produce_a_report() {
    let tmp = TempDir::new().unwrap();
    let run = run_compare(&config(
        tmp.path().join("nope-a"),
        tmp.path().join("nope-b"),
        tmp.path(),
        &[],
        20,
    ))
    .unwrap();
    assert!(!run.report.tiles.present_a);
    assert!(run.report.ticks.metrics.is_empty());
}
