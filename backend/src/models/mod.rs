//! Domain types flowing through a run.
//!
//! Data moves one way: [`HourlySampleSeries`] → [`AveragedConditions`] →
//! [`DerivedQuantities`] → [`Snapshot`] and [`HistoricalEntry`]. Each stage
//! produces a fresh value; nothing is updated in place across stages.

pub mod conditions;
pub mod constants;
pub mod history;
pub mod quantities;
pub mod snapshot;

pub use conditions::{AveragedConditions, HourlySampleSeries, BOUNDARY_LAYER_HEIGHT, WIND_SPEED_10M};
pub use constants::{Coordinates, GeographicConstants};
pub use history::{upsert, HistoricalEntry, HistoricalSeries, UpsertOutcome};
pub use quantities::DerivedQuantities;
pub use snapshot::Snapshot;
