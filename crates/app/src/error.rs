//! Errors that stop the harness before or after the suite runs.

use restcheck_application::ApplicationError;
use restcheck_infrastructure::{ConfigError, ExportError};
use thiserror::Error;

/// Setup and reporting errors. Scenario failures are not errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The runner could not be assembled.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// The report could not be written.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// The mock backend could not be started.
    #[error("failed to start mock backend: {0}")]
    Fixture(#[from] std::io::Error),
}
