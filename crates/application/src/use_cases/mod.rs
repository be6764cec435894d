//! Application use cases (harness orchestration).

mod run_scenario;
mod run_suite;

pub use run_scenario::RunScenario;
pub use run_suite::RunSuite;
