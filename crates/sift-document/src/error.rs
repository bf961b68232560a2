//! Error types for loading records and term stores.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur when loading input files.
///
/// Building a document never fails; these errors only arise at the file boundary.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read a file.
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse JSON input.
    #[error("failed to parse {path}: {source}")]
    ParseJson {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}
