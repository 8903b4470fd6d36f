//! # Airshed emission cap
//!
//! Daily permissible emission cap for an enclosed airshed basin, computed with
//! a steady-state box model from forecast boundary-layer height and wind
//! speed.
//!
//! ## Architecture
//!
//! - [`weather`]: hourly forecast retrieval behind the [`weather::ForecastSource`] trait
//! - [`services`]: averaging, the box model and the run coordinator
//! - [`models`]: domain types (constants, conditions, snapshot, history)
//! - [`db`]: history repository pattern and its JSON-file backend
//! - [`io`]: atomic JSON writes and the snapshot file
//! - [`config`]: TOML configuration with environment overrides
//! - [`report`]: console rendering of a finished run
//!
//! A run is `fetch → compute → snapshot → history`; see
//! [`services::RunCoordinator`].

// RepositoryError carries owned messages
#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod error;
pub mod io;
pub mod models;
pub mod report;
pub mod services;
pub mod units;
pub mod weather;

pub use config::AppConfig;
pub use error::RunError;
pub use services::{RunCoordinator, RunReport, RunStage};
