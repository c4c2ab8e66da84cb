//! Reading and writing the machine-readable catalog snapshot.

use crate::error::{IndexerError, Result};
use camino::Utf8Path;
use release_catalog::export::CatalogSnapshot;

/// Serialise a snapshot as pretty-printed JSON with a trailing newline.
///
/// # Errors
///
/// Returns [`IndexerError::Snapshot`] if serialisation fails.
pub fn snapshot_json(snapshot: &CatalogSnapshot) -> Result<String> {
    let mut json = serde_json::to_string_pretty(snapshot)?;
    json.push('\n');
    Ok(json)
}

/// Write a snapshot to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`IndexerError::Snapshot`] if serialisation fails or
/// [`IndexerError::WriteFailed`] if the file cannot be written.
pub fn write_snapshot(path: &Utf8Path, snapshot: &CatalogSnapshot) -> Result<()> {
    write_output(path, &snapshot_json(snapshot)?)
}

/// Read a snapshot previously written by [`write_snapshot`].
///
/// # Errors
///
/// Returns [`IndexerError::ReadFailed`] if the file cannot be read or
/// [`IndexerError::Snapshot`] if it is not a valid snapshot.
pub fn read_snapshot(path: &Utf8Path) -> Result<CatalogSnapshot> {
    let json = std::fs::read_to_string(path).map_err(|source| IndexerError::ReadFailed {
        path: path.to_owned(),
        source,
    })?;
    Ok(serde_json::from_str(&json)?)
}

/// Write `contents` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`IndexerError::WriteFailed`] if a directory or the file cannot be
/// written.
pub fn write_output(path: &Utf8Path, contents: &str) -> Result<()> {
    let write_failed = |source| IndexerError::WriteFailed {
        path: path.to_owned(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_failed)?;
    }
    std::fs::write(path, contents).map_err(write_failed)
}
