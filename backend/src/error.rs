//! Run-level errors and the process exit-code contract.

use crate::db::RepositoryError;
use crate::services::box_model::BoxModelError;
use crate::weather::SamplerError;

/// Why a run stopped.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Fetching stage: transport failure, malformed response or no valid
    /// samples.
    #[error("Atmospheric data unavailable: {0}")]
    DataUnavailable(#[from] SamplerError),

    /// Computing stage.
    #[error("Box model computation failed: {0}")]
    Computation(#[from] BoxModelError),

    /// Persisting stage, before the history is touched.
    #[error("Failed to write snapshot: {0}")]
    Snapshot(#[source] RepositoryError),

    /// Persisting stage, after the snapshot was written.
    #[error("Failed to update history: {0}")]
    History(#[source] RepositoryError),
}

/// Process exit status for a successful run.
pub const EXIT_SUCCESS: u8 = 0;
/// Setup failed before the run started (configuration, HTTP client).
pub const EXIT_SETUP_FAILURE: u8 = 1;
/// The weather data could not be obtained.
pub const EXIT_DATA_UNAVAILABLE: u8 = 2;
/// The averaged conditions admit no meaningful cap.
pub const EXIT_COMPUTATION_FAILURE: u8 = 3;
/// The snapshot or the history could not be written.
pub const EXIT_PERSISTENCE_FAILURE: u8 = 4;

impl RunError {
    /// Exit status reported by the binary for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::DataUnavailable(_) => EXIT_DATA_UNAVAILABLE,
            RunError::Computation(_) => EXIT_COMPUTATION_FAILURE,
            RunError::Snapshot(_) | RunError::History(_) => EXIT_PERSISTENCE_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_and_non_zero() {
        let errors = [
            RunError::from(SamplerError::Transport("timeout".into())),
            RunError::from(BoxModelError::DegenerateResidenceTime {
                wind_speed_kmh: 0.0,
            }),
            RunError::Snapshot(RepositoryError::IoError("read-only".into())),
        ];
        let codes: Vec<u8> = errors.iter().map(RunError::exit_code).collect();
        assert_eq!(codes, vec![2, 3, 4]);
        assert!(codes.iter().all(|c| *c != EXIT_SUCCESS));
    }

    #[test]
    fn test_history_failure_shares_persistence_code() {
        let err = RunError::History(RepositoryError::IoError("disk full".into()));
        assert_eq!(err.exit_code(), EXIT_PERSISTENCE_FAILURE);
        assert!(err.to_string().contains("disk full"));
    }
}
