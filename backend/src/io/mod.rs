//! JSON output files.
//!
//! Both the snapshot and the history are written with
//! [`write_json_atomic`]: the document is serialized into a temporary file in
//! the target directory, flushed, then renamed over the target.

use std::fs;
use std::io::Write;
use std::path::Path;

use log::info;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::db::repository::{RepositoryError, RepositoryResult};
use crate::models::Snapshot;

/// Write `value` as pretty-printed JSON to `path`, creating missing parent
/// directories.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> RepositoryResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| {
        RepositoryError::IoError(format!("Failed to create {}: {}", dir.display(), e))
    })?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| {
        RepositoryError::IoError(format!("Failed to create temp file in {}: {}", dir.display(), e))
    })?;

    serde_json::to_writer_pretty(&mut tmp, value)
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;
    tmp.write_all(b"\n")
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| RepositoryError::IoError(format!("Failed to flush temp file: {}", e)))?;

    tmp.persist(path).map_err(|e| {
        RepositoryError::IoError(format!("Failed to replace {}: {}", path.display(), e.error))
    })?;
    Ok(())
}

/// Write the single-run snapshot to `path`.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> RepositoryResult<()> {
    write_json_atomic(path, snapshot)?;
    info!("Snapshot: saved to {}", path.display());
    Ok(())
}
