//! Application error types

use restcheck_domain::DomainError;
use thiserror::Error;

use crate::ports::{HttpClientError, SchemaError};

/// Application-level errors.
///
/// Scenario verdicts are values, not errors; these cover setting up a run.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A scenario could not be authored.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The HTTP transport could not be set up.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpClientError),

    /// A schema could not be loaded.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
