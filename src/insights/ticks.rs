//! Tick time-series summary.

use crate::domain::{OrderedMap, SeriesSummary, TickSummary};
use crate::io::ingest::Table;
use crate::plot::{DEFAULT_WIDTH, sparkline};
use crate::schema::{DAY_CANDIDATES, TICK_SERIES_CATALOG, choose_column, parse_float};

/// Summarize the well-known tick series. `None` for a table with no rows.
pub fn summarize_ticks(table: &Table) -> Option<TickSummary> {
    if table.is_empty() {
        return None;
    }

    let mut series = OrderedMap::new();
    for (name, candidates) in TICK_SERIES_CATALOG {
        let Some(column) = choose_column(&table.headers, candidates) else {
            continue;
        };
        let Some(col) = table.column_index(&column) else {
            continue;
        };
        let values: Vec<Option<f64>> = table.column_cells(col).map(parse_float).collect();
        series.insert(*name, summarize_series(column, &values));
    }

    Some(TickSummary {
        rows: table.len(),
        day_col: choose_column(&table.headers, DAY_CANDIDATES),
        series,
    })
}

fn summarize_series(column: String, values: &[Option<f64>]) -> SeriesSummary {
    let present = || values.iter().flatten().copied();
    SeriesSummary {
        column,
        spark: sparkline(values, DEFAULT_WIDTH),
        start: values.first().copied().flatten(),
        end: values.last().copied().flatten(),
        min: present().reduce(f64::min),
        max: present().reduce(f64::max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarizes_known_series() {
        let t = Table::from_rows(
            &["Tick", "Pop", "cash", "notes"],
            &[
                &["0", "10", "100", "a"],
                &["1", "", "90", "b"],
                &["2", "30", "80", "c"],
            ],
        );
        let s = summarize_ticks(&t).unwrap();
        assert_eq!(s.rows, 3);
        assert_eq!(s.day_col.as_deref(), Some("Tick"));

        let names: Vec<&str> = s.series.keys().collect();
        assert_eq!(names, vec!["population", "money"]);

        let pop = s.series.get("population").unwrap();
        assert_eq!(pop.column, "Pop");
        assert_eq!((pop.start, pop.end), (Some(10.0), Some(30.0)));
        assert_eq!((pop.min, pop.max), (Some(10.0), Some(30.0)));
        assert_eq!(pop.spark, "▁ █");

        let money = s.series.get("money").unwrap();
        assert_eq!((money.min, money.max), (Some(80.0), Some(100.0)));
    }

    #[test]
    fn empty_table_has_no_summary() {
        let t = Table::from_rows(&["day", "population"], &[]);
        assert_eq!(summarize_ticks(&t), None);
    }

    #[test]
    fn missing_endpoints_are_none() {
        let t = Table::from_rows(&["day", "jobs"], &[&["1", ""], &["2", "4"], &["3", "n/a"]]);
        let s = summarize_ticks(&t).unwrap();
        let jobs = s.series.get("jobs").unwrap();
        assert_eq!((jobs.start, jobs.end), (None, None));
        assert_eq!((jobs.min, jobs.max), (Some(4.0), Some(4.0)));
        // A single distinct value renders flat.
        assert_eq!(jobs.spark, "▁▁▁");
    }
}
