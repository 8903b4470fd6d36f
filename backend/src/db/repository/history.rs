//! Storage trait for the historical series.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::HistoricalSeries;

/// Repository trait for the day-keyed historical series.
///
/// The whole series is read and written at once; there is no incremental
/// protocol. No locking is provided: two processes saving to the same
/// store concurrently is unsupported.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Load the stored series.
    ///
    /// # Returns
    /// * `Ok(series)` - The stored series, or an empty one if nothing is stored yet
    ///   or the stored content is unreadable as a series
    /// * `Err(RepositoryError)` - If the store exists but cannot be accessed
    async fn load(&self) -> RepositoryResult<HistoricalSeries>;

    /// Replace the stored series with `series`.
    ///
    /// Readers never observe a partially written series.
    async fn save(&self, series: &HistoricalSeries) -> RepositoryResult<()>;

    /// Human-readable location of the store, for logs and reports.
    fn location(&self) -> String;
}
