//! History service layer: business logic on top of [`HistoryRepository`].

use log::info;

use super::repository::{HistoryRepository, RepositoryResult};
use crate::models::{upsert, HistoricalEntry, UpsertOutcome};

/// Record `entry` in the stored history.
///
/// Loads the whole series, upserts the entry by date and writes the whole
/// series back.
///
/// # Returns
/// * `Ok(UpsertOutcome)` - Whether the date was new or replaced
/// * `Err` if the store cannot be read or written
pub async fn record_entry<R: HistoryRepository + ?Sized>(
    repo: &R,
    entry: HistoricalEntry,
) -> RepositoryResult<UpsertOutcome> {
    let date = entry.date;
    let series = repo.load().await?;
    let previous_len = series.len();

    let (series, outcome) = upsert(series, entry);
    match outcome {
        UpsertOutcome::Replaced { index } => {
            info!("History: updated existing entry for {} (position {})", date, index)
        }
        UpsertOutcome::Inserted { .. } => info!(
            "History: added new entry for {} ({} -> {} entries)",
            date,
            previous_len,
            series.len()
        ),
    }

    repo.save(&series).await?;
    info!("History: saved to {}", repo.location());
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::models::HistoricalSeries;
    use chrono::DateTime;

    fn entry(date: &str, cap: f64) -> HistoricalEntry {
        HistoricalEntry {
            date: date.parse().unwrap(),
            timestamp: DateTime::parse_from_rfc3339(&format!("{}T08:00:00+07:00", date)).unwrap(),
            emission_cap_tons_day: cap,
            blh_avg_m: 900.0,
            wind_speed_avg_kmh: 5.5,
            residence_time_hours: 14.5,
        }
    }

    #[tokio::test]
    async fn test_record_new_and_existing_dates() {
        let repo = LocalRepository::with_series(HistoricalSeries::from(vec![entry("2026-10-16", 90.0)]));

        let first = record_entry(&repo, entry("2026-10-17", 100.0)).await.unwrap();
        let second = record_entry(&repo, entry("2026-10-17", 110.0)).await.unwrap();

        assert_eq!(first, UpsertOutcome::Inserted { index: 1 });
        assert_eq!(second, UpsertOutcome::Replaced { index: 1 });
        let stored = repo.stored();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored.entries()[1].emission_cap_tons_day, 110.0);
        assert_eq!(repo.save_count(), 2);
    }

    #[tokio::test]
    async fn test_save_failure_is_returned() {
        let repo = LocalRepository::new();
        repo.set_fail_saves(true);

        assert!(record_entry(&repo, entry("2026-10-17", 100.0)).await.is_err());
        assert!(repo.stored().is_empty());
    }
}
