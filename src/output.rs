use crate::error::TrackerError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use tempfile::NamedTempFile;

/// Writes `contents` to `path` through a temp file in the same directory and
/// a final rename. On any failure the temp file is dropped and `path` is left
/// untouched, so readers never see a half-written artifact.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), TrackerError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| TrackerError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "Wrote artifact");
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), TrackerError> {
    let s = serde_json::to_string_pretty(value)?;
    write_atomic(path, s.as_bytes())
}

/// Renders up to `max_rows` rows as a markdown table, or `(no rows)`.
pub fn preview_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", preview_table(rows, max_rows));
}
