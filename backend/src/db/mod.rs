//! Persistence of the historical series via the Repository pattern.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  Service Layer (services.rs) - load/upsert/save│
//! └───────────────────┬───────────────────────────┘
//!                     │
//! ┌───────────────────▼───────────────────────────┐
//! │  HistoryRepository trait (repository/)        │
//! └───────────────────┬───────────────────────────┘
//!          ┌──────────┴───────────┐
//! ┌────────▼─────────┐   ┌────────▼─────────┐
//! │ JsonFileRepository│   │ LocalRepository  │
//! │ (JSON on disk)    │   │ (in-memory)      │
//! └──────────────────┘   └──────────────────┘
//! ```

pub mod repositories;
pub mod repository;
pub mod services;

pub use repositories::{JsonFileRepository, LocalRepository};
pub use repository::{HistoryRepository, RepositoryError, RepositoryResult};
