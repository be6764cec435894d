//! Restcheck - Main Entry Point
//!
//! Loads configuration, runs the reqres suite and exits with 0 when every
//! scenario passed, 1 when any failed and 2 when the harness could not run.

use std::process::ExitCode;

use restcheck::{AppError, Harness, suite};
use restcheck_application::ApplicationError;
use restcheck_infrastructure::{DEFAULT_DIRECTIVE, HarnessConfig, init_tracing};

const SETUP_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing(DEFAULT_DIRECTIVE);

    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!(error = %e, "harness could not run");
            eprintln!("error: {e}");
            ExitCode::from(SETUP_FAILURE)
        }
    }
}

async fn run() -> Result<u8, AppError> {
    let config = HarnessConfig::load()?;
    let harness = Harness::from_config(&config).await?;
    let scenarios = suite::scenarios().map_err(ApplicationError::from)?;

    let report = harness.run(&scenarios).await?;
    println!("{report}");

    Ok(report.exit_code())
}
