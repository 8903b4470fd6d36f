//! File-backed history repository.
//!
//! The series is stored as a pretty-printed JSON array. Saves go through a
//! temporary file in the same directory that is renamed over the target.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, warn};

use crate::db::repository::{HistoryRepository, RepositoryError, RepositoryResult};
use crate::io::write_json_atomic;
use crate::models::HistoricalSeries;

/// Suffix of the copy kept when the stored file cannot be parsed.
pub const CORRUPT_BACKUP_SUFFIX: &str = "corrupt";

/// History stored in a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unparseable file is copied before it is replaced.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".");
        name.push(CORRUPT_BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    /// First backup location not already taken: `<path>.corrupt`, then
    /// `<path>.corrupt.1`, `<path>.corrupt.2`, ...
    pub fn next_backup_path(&self) -> PathBuf {
        let base = self.backup_path();
        let mut candidate = base.clone();
        let mut n = 0u32;
        while candidate.exists() {
            n += 1;
            let mut name = base.as_os_str().to_owned();
            name.push(format!(".{}", n));
            candidate = PathBuf::from(name);
        }
        candidate
    }

    fn back_up_unreadable(&self) {
        let backup = self.next_backup_path();
        match fs::copy(&self.path, &backup) {
            Ok(_) => warn!(
                "Kept a copy of the unreadable history at {}",
                backup.display()
            ),
            Err(e) => warn!(
                "Could not back up unreadable history to {}: {}",
                backup.display(),
                e
            ),
        }
    }
}

#[async_trait]
impl HistoryRepository for JsonFileRepository {
    async fn load(&self) -> RepositoryResult<HistoricalSeries> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No history at {}, starting a new series", self.path.display());
                return Ok(HistoricalSeries::new());
            }
            Err(e) => {
                return Err(RepositoryError::IoError(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        // Unparseable history is discarded in favour of a fresh series
        match serde_json::from_str::<HistoricalSeries>(&content) {
            Ok(series) => Ok(series),
            Err(e) => {
                warn!(
                    "History at {} is not a valid series ({}); starting a new series",
                    self.path.display(),
                    e
                );
                self.back_up_unreadable();
                Ok(HistoricalSeries::new())
            }
        }
    }

    async fn save(&self, series: &HistoricalSeries) -> RepositoryResult<()> {
        write_json_atomic(&self.path, series)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
