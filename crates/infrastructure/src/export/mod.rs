//! Report export.
//!
//! Captured exchanges are written out as an HTTP Archive.

mod har;

pub use har::HarExporter;

use thiserror::Error;

/// Export error type.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The report could not be written.
    #[error("failed to write report to {path}: {message}")]
    Io {
        /// Destination path.
        path: String,
        /// I/O error message.
        message: String,
    },
}
