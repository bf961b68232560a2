//! Error types for the sift-index crate.

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed error returned by a [`crate::QueryExecutor`].
pub type ExecutorError = Box<dyn StdError + Send + Sync>;

/// Errors that can occur when running a search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The query executor failed.
    #[error("search engine request failed: {0}")]
    Executor(#[source] ExecutorError),

    /// The engine response did not have the expected shape.
    #[error("invalid search engine response: {0}")]
    InvalidResponse(String),
}
