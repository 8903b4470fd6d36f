//! Repository implementations.
//!
//! - [`json_file`]: JSON array on disk (production)
//! - [`local`]: in-memory, for tests and dry runs

pub mod json_file;
pub mod local;

pub use json_file::JsonFileRepository;
pub use local::LocalRepository;
