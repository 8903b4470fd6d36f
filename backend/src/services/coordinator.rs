//! Run coordination: fetch → compute → snapshot → history.
//!
//! ```text
//! Idle → Fetching → Computing → Persisting → Done
//!           │           │            │
//!           └───────────┴────────────┴──→ Failed
//! ```
//!
//! The snapshot is always written before the history is touched. A failure
//! at any stage stops the run there, so a failed fetch leaves both files
//! untouched and a failed snapshot leaves the history untouched.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local};
use log::{error, info};

use super::box_model;
use super::sampler::AtmosphericSampler;
use crate::db::{services as history_service, HistoryRepository};
use crate::error::RunError;
use crate::io;
use crate::models::{
    AveragedConditions, DerivedQuantities, GeographicConstants, HistoricalEntry, Snapshot,
    UpsertOutcome,
};
use crate::weather::ForecastSource;

/// Lifecycle stage of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Idle,
    Fetching,
    Computing,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStage::Idle => "idle",
            RunStage::Fetching => "fetching",
            RunStage::Computing => "computing",
            RunStage::Persisting => "persisting",
            RunStage::Done => "done",
            RunStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub timestamp: DateTime<FixedOffset>,
    pub constants: GeographicConstants,
    pub conditions: AveragedConditions,
    pub derived: DerivedQuantities,
    pub entry: HistoricalEntry,
    pub history_outcome: UpsertOutcome,
    pub snapshot_path: PathBuf,
    pub history_location: String,
}

/// Sequences one run over a forecast source and a history repository.
pub struct RunCoordinator<S: ForecastSource, R: HistoryRepository> {
    constants: GeographicConstants,
    sampler: AtmosphericSampler<S>,
    history: R,
    snapshot_path: PathBuf,
    stage: RunStage,
}

impl<S: ForecastSource, R: HistoryRepository> RunCoordinator<S, R> {
    pub fn new(
        constants: GeographicConstants,
        sampler: AtmosphericSampler<S>,
        history: R,
        snapshot_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            constants,
            sampler,
            history,
            snapshot_path: snapshot_path.into(),
            stage: RunStage::Idle,
        }
    }

    /// Current stage.
    pub fn stage(&self) -> RunStage {
        self.stage
    }

    pub fn history(&self) -> &R {
        &self.history
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Run the pipeline once for the current local time.
    pub async fn run(&mut self) -> Result<RunReport, RunError> {
        self.run_at(Local::now().fixed_offset()).await
    }

    /// Run the pipeline once as if computed at `timestamp`; the history
    /// entry is keyed by `timestamp`'s calendar date.
    pub async fn run_at(&mut self, timestamp: DateTime<FixedOffset>) -> Result<RunReport, RunError> {
        self.stage = RunStage::Idle;
        let day = timestamp.date_naive();

        self.enter(RunStage::Fetching);
        let conditions = match self.sampler.fetch(self.constants.coordinates, day).await {
            Ok(conditions) => conditions,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.enter(RunStage::Computing);
        let derived = match box_model::derive(&self.constants, &conditions) {
            Ok(derived) => derived,
            Err(e) => return Err(self.fail(e.into())),
        };
        info!(
            "Emission cap: {:.0} µg/s ({:.2} tons/day)",
            derived.emission_cap_ug_s, derived.emission_cap_tons_day
        );

        self.enter(RunStage::Persisting);
        let snapshot = Snapshot::from_run(timestamp, &self.constants, &conditions, &derived);
        if let Err(e) = io::write_snapshot(&self.snapshot_path, &snapshot) {
            return Err(self.fail(RunError::Snapshot(e)));
        }

        let entry = HistoricalEntry::from_run(timestamp, &conditions, &derived);
        let history_outcome = match history_service::record_entry(&self.history, entry.clone()).await {
            Ok(outcome) => outcome,
            Err(e) => return Err(self.fail(RunError::History(e))),
        };

        self.enter(RunStage::Done);
        Ok(RunReport {
            timestamp,
            constants: self.constants.clone(),
            conditions,
            derived,
            entry,
            history_outcome,
            snapshot_path: self.snapshot_path.clone(),
            history_location: self.history.location(),
        })
    }

    fn enter(&mut self, next: RunStage) {
        info!("Run: {} -> {}", self.stage, next);
        self.stage = next;
    }

    fn fail(&mut self, err: RunError) -> RunError {
        error!("Run failed while {}: {}", self.stage, err);
        self.stage = RunStage::Failed;
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::LocalRepository;
    use crate::weather::StaticForecastSource;
    use tempfile::tempdir;

    fn at(raw: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(raw).unwrap()
    }

    fn coordinator(
        source: StaticForecastSource,
        snapshot_path: PathBuf,
    ) -> RunCoordinator<StaticForecastSource, LocalRepository> {
        RunCoordinator::new(
            GeographicConstants::default(),
            AtmosphericSampler::new(source, 1, "Asia/Bangkok"),
            LocalRepository::new(),
            snapshot_path,
        )
    }

    #[tokio::test]
    async fn test_successful_run_reaches_done() {
        let dir = tempdir().unwrap();
        let source = StaticForecastSource::from_values(
            vec![Some(1000.0), Some(1200.0), None, Some(1100.0)],
            vec![Some(10.0), Some(12.0), Some(8.0), None],
        );
        let mut run = coordinator(source, dir.path().join("snapshot.json"));
        assert_eq!(run.stage(), RunStage::Idle);

        let report = run.run_at(at("2026-10-17T07:05:00+07:00")).await.unwrap();

        assert_eq!(run.stage(), RunStage::Done);
        assert_eq!(report.entry.date.to_string(), "2026-10-17");
        assert_eq!(report.history_outcome, UpsertOutcome::Inserted { index: 0 });
        assert_eq!(report.entry.emission_cap_tons_day, 185.64);
        assert!(run.snapshot_path().exists());
        assert_eq!(run.history().stored().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_writes_nothing() {
        let dir = tempdir().unwrap();
        let snapshot_path = dir.path().join("snapshot.json");
        let mut run = coordinator(StaticForecastSource::unreachable("dns failure"), snapshot_path.clone());

        let err = run.run_at(at("2026-10-17T07:05:00+07:00")).await.unwrap_err();

        assert!(matches!(err, RunError::DataUnavailable(_)));
        assert_eq!(run.stage(), RunStage::Failed);
        assert!(!snapshot_path.exists());
        assert_eq!(run.history().save_count(), 0);
    }

    #[tokio::test]
    async fn test_calm_wind_fails_in_computing() {
        let dir = tempdir().unwrap();
        let snapshot_path = dir.path().join("snapshot.json");
        let source = StaticForecastSource::from_values(vec![Some(300.0); 24], vec![Some(0.0); 24]);
        let mut run = coordinator(source, snapshot_path.clone());

        let err = run.run_at(at("2026-10-17T07:05:00+07:00")).await.unwrap_err();

        assert!(matches!(
            err,
            RunError::Computation(box_model::BoxModelError::DegenerateResidenceTime { .. })
        ));
        assert_eq!(err.exit_code(), 3);
        assert!(!snapshot_path.exists());
        assert_eq!(run.history().save_count(), 0);
    }

    #[tokio::test]
    async fn test_snapshot_failure_leaves_history_untouched() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let source = StaticForecastSource::from_values(vec![Some(900.0)], vec![Some(7.0)]);
        let mut run = coordinator(source, blocker.join("snapshot.json"));

        let err = run.run_at(at("2026-10-17T07:05:00+07:00")).await.unwrap_err();

        assert!(matches!(err, RunError::Snapshot(_)));
        assert_eq!(run.stage(), RunStage::Failed);
        assert_eq!(run.history().save_count(), 0);
    }

    #[tokio::test]
    async fn test_history_failure_is_reported() {
        let dir = tempdir().unwrap();
        let source = StaticForecastSource::from_values(vec![Some(900.0)], vec![Some(7.0)]);
        let mut run = coordinator(source, dir.path().join("snapshot.json"));
        run.history().set_fail_saves(true);

        let err = run.run_at(at("2026-10-17T07:05:00+07:00")).await.unwrap_err();

        assert!(matches!(err, RunError::History(_)));
        assert_eq!(err.exit_code(), 4);
    }

    #[tokio::test]
    async fn test_second_run_same_day_replaces_entry() {
        let dir = tempdir().unwrap();
        let source = StaticForecastSource::from_values(vec![Some(900.0)], vec![Some(7.0)]);
        let mut run = coordinator(source, dir.path().join("snapshot.json"));

        run.run_at(at("2026-10-17T07:05:00+07:00")).await.unwrap();
        let report = run.run_at(at("2026-10-17T19:40:00+07:00")).await.unwrap();

        assert_eq!(report.history_outcome, UpsertOutcome::Replaced { index: 0 });
        let stored = run.history().stored();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.entries()[0].timestamp, at("2026-10-17T19:40:00+07:00"));
    }
}
