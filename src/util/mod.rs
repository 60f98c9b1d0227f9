//! Shared utility helpers.

pub mod error;

pub use error::{SearchError, SearchResult, WorkerFailure};
