//! Run pipeline services.
//!
//! - [`sampler`]: fetch hourly conditions and average them
//! - [`box_model`]: volume, residence time and emission cap
//! - [`coordinator`]: sequence the stages and persist the results

pub mod box_model;
pub mod coordinator;
pub mod sampler;

pub use box_model::{derive, BoxModelError};
pub use coordinator::{RunCoordinator, RunReport, RunStage};
pub use sampler::{mean_of_present, AtmosphericSampler};
