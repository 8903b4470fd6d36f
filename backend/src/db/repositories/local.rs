//! In-memory history repository.
//!
//! Suitable for unit tests and dry runs. Clones share the same storage.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::db::repository::{HistoryRepository, RepositoryError, RepositoryResult};
use crate::models::HistoricalSeries;

/// In-memory local repository.
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Default)]
struct LocalData {
    series: HistoricalSeries,
    save_count: usize,
    fail_saves: bool,
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with `series`.
    pub fn with_series(series: HistoricalSeries) -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData {
                series,
                ..Default::default()
            })),
        }
    }

    /// Make every subsequent save fail, to exercise error paths.
    pub fn set_fail_saves(&self, fail: bool) {
        if let Ok(mut data) = self.write() {
            data.fail_saves = fail;
        }
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.read().map(|data| data.save_count).unwrap_or(0)
    }

    /// Copy of the currently stored series.
    pub fn stored(&self) -> HistoricalSeries {
        self.read()
            .map(|data| data.series.clone())
            .unwrap_or_default()
    }

    fn read(&self) -> RepositoryResult<std::sync::RwLockReadGuard<'_, LocalData>> {
        self.data
            .read()
            .map_err(|e| RepositoryError::InternalError(format!("Lock poisoned: {}", e)))
    }

    fn write(&self) -> RepositoryResult<std::sync::RwLockWriteGuard<'_, LocalData>> {
        self.data
            .write()
            .map_err(|e| RepositoryError::InternalError(format!("Lock poisoned: {}", e)))
    }
}

#[async_trait]
impl HistoryRepository for LocalRepository {
    async fn load(&self) -> RepositoryResult<HistoricalSeries> {
        Ok(self.read()?.series.clone())
    }

    async fn save(&self, series: &HistoricalSeries) -> RepositoryResult<()> {
        let mut data = self.write()?;
        if data.fail_saves {
            return Err(RepositoryError::IoError(
                "local repository is read-only".to_string(),
            ));
        }
        data.series = series.clone();
        data.save_count += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_storage() {
        let repo = LocalRepository::new();
        let other = repo.clone();

        other.save(&HistoricalSeries::new()).await.unwrap();
        assert_eq!(repo.save_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_saves_leave_series_untouched() {
        let repo = LocalRepository::new();
        repo.set_fail_saves(true);

        assert!(repo.save(&HistoricalSeries::new()).await.is_err());
        assert_eq!(repo.save_count(), 0);
    }
}
