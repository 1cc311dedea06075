//! Write report files (pretty JSON and Markdown).
//!
//! Parent directories are created as needed. Every failure maps to the output exit
//! code.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::AppError;

/// Write any serializable report as pretty-printed JSON with a trailing newline.
pub fn write_json_report<T: Serialize>(path: &Path, report: &T) -> Result<(), AppError> {
    ensure_parent(path)?;
    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create JSON report '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, report)
        .map_err(|e| AppError::output(format!("Failed to write JSON report '{}': {e}", path.display())))?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| AppError::output(format!("Failed to write JSON report '{}': {e}", path.display())))?;

    Ok(())
}

pub fn write_markdown(path: &Path, text: &str) -> Result<(), AppError> {
    ensure_parent(path)?;
    std::fs::write(path, text)
        .map_err(|e| AppError::output(format!("Failed to write Markdown report '{}': {e}", path.display())))
}

fn ensure_parent(path: &Path) -> Result<(), AppError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir).map_err(|e| {
            AppError::output(format!("Failed to create directory '{}': {e}", dir.display()))
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_report_creates_parents_and_ends_with_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/report.json");
        write_json_report(&path, &json!({"tool": "x", "n": 1})).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("}\n"));
        let back: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back["n"], 1);
    }

    #[test]
    fn markdown_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b.md");
        write_markdown(&path, "# hi\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# hi\n");
    }

    #[test]
    fn unwritable_target_is_an_output_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a file.
        let err = write_markdown(dir.path(), "x").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_OUTPUT);
    }
}
