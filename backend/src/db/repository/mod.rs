//! Repository trait definitions.
//!
//! - [`error`]: Error types for repository operations
//! - [`history`]: Load/save of the historical series

pub mod error;
pub mod history;

pub use error::{RepositoryError, RepositoryResult};
pub use history::HistoryRepository;
