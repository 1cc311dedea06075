//! Dossier artifact ingestion.
//!
//! A dossier directory may hold up to three artifacts. Each is loaded independently
//! into an [`ArtifactLoad`], so a missing or broken file only affects its own report
//! section:
//!
//! - `summary.json`: a flat JSON object
//! - `ticks.csv`: per-day rows
//! - `tile_metrics.csv`: per-tile rows keyed by `(x, y)`
//!
//! Tables are kept as raw strings. Typing happens later in schema discovery, which is
//! what lets the tools work across exporter versions without a fixed schema.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use serde_json::{Map, Value};

pub const SUMMARY_FILE: &str = "summary.json";
pub const TICKS_FILE: &str = "ticks.csv";
pub const TILES_FILE: &str = "tile_metrics.csv";

/// Flat key-value run summary.
pub type Summary = Map<String, Value>;

/// Outcome of loading one artifact.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactLoad<T> {
    Present(T),
    Absent,
    /// The file exists but could not be read or has the wrong shape.
    Malformed(String),
}

impl<T> ArtifactLoad<T> {
    pub fn present(&self) -> Option<&T> {
        match self {
            ArtifactLoad::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, ArtifactLoad::Present(_))
    }

    pub fn into_present(self) -> Option<T> {
        match self {
            ArtifactLoad::Present(v) => Some(v),
            _ => None,
        }
    }
}

/// A CSV table held as raw cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Build a table from string slices (handy for tests and generators).
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Index of the first header named exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at `(row, col)`; short rows read as empty cells.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// All cells of a column, in row order.
    pub fn column_cells(&self, col: usize) -> impl Iterator<Item = &str> + '_ {
        (0..self.rows.len()).map(move |r| self.cell(r, col))
    }
}

/// Resolved artifact paths for one dossier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DossierPaths {
    pub dir: PathBuf,
    pub summary: PathBuf,
    pub ticks: PathBuf,
    pub tiles: PathBuf,
}

impl DossierPaths {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            summary: dir.join(SUMMARY_FILE),
            ticks: dir.join(TICKS_FILE),
            tiles: dir.join(TILES_FILE),
        }
    }

    /// Replace individual artifact paths with explicit overrides.
    pub fn with_overrides(
        mut self,
        summary: Option<&Path>,
        ticks: Option<&Path>,
        tiles: Option<&Path>,
    ) -> Self {
        if let Some(p) = summary {
            self.summary = p.to_path_buf();
        }
        if let Some(p) = ticks {
            self.ticks = p.to_path_buf();
        }
        if let Some(p) = tiles {
            self.tiles = p.to_path_buf();
        }
        self
    }
}

/// All artifacts of one dossier.
#[derive(Debug, Clone)]
pub struct LoadedDossier {
    pub paths: DossierPaths,
    pub summary: ArtifactLoad<Summary>,
    pub ticks: ArtifactLoad<Table>,
    pub tiles: ArtifactLoad<Table>,
}

pub fn load_dossier(paths: DossierPaths) -> LoadedDossier {
    let summary = load_summary(&paths.summary);
    let ticks = load_table(&paths.ticks);
    let tiles = load_table(&paths.tiles);
    log_degraded(&paths.summary, &summary);
    log_degraded(&paths.ticks, &ticks);
    log_degraded(&paths.tiles, &tiles);
    LoadedDossier {
        paths,
        summary,
        ticks,
        tiles,
    }
}

/// Load `summary.json`. Anything other than a JSON object is malformed.
pub fn load_summary(path: &Path) -> ArtifactLoad<Summary> {
    if !path.exists() {
        return ArtifactLoad::Absent;
    }
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => return ArtifactLoad::Malformed(format!("read error: {e}")),
    };
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => ArtifactLoad::Present(map),
        Ok(_) => ArtifactLoad::Malformed("top-level JSON value is not an object".to_string()),
        Err(e) => ArtifactLoad::Malformed(format!("invalid JSON: {e}")),
    }
}

/// Load a CSV table (header row + data rows).
pub fn load_table(path: &Path) -> ArtifactLoad<Table> {
    if !path.exists() {
        return ArtifactLoad::Absent;
    }
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => return ArtifactLoad::Malformed(format!("open error: {e}")),
    };
    match read_table(file) {
        Ok(table) => ArtifactLoad::Present(table),
        Err(e) => ArtifactLoad::Malformed(e),
    }
}

/// Parse CSV text from any reader into a [`Table`].
pub fn read_table<R: std::io::Read>(reader: R) -> Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| format!("CSV header error: {e}"))?
        .clone();
    let headers = normalize_headers(&headers);

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: 1-based lines, plus the header line.
        let record = result.map_err(|e| format!("CSV parse error on line {}: {e}", idx + 2))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table { headers, rows })
}

fn normalize_headers(headers: &StringRecord) -> Vec<String> {
    headers
        .iter()
        // Spreadsheet tools like to prepend a BOM to the first header.
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect()
}

fn log_degraded<T>(path: &Path, load: &ArtifactLoad<T>) {
    match load {
        ArtifactLoad::Present(_) => log::debug!("loaded {}", path.display()),
        ArtifactLoad::Absent => log::info!("{} not found; section skipped", path.display()),
        ArtifactLoad::Malformed(reason) => {
            log::warn!("{} unreadable ({reason}); treated as absent", path.display())
        }
    }
}
