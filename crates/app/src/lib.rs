//! Restcheck - contract test harness for the reqres user API.
//!
//! The library exposes the suite, its bundled schemas, the mock backend
//! and the wiring used by the `restcheck` binary, so integration tests
//! can drive the same harness the binary runs.

pub mod error;
pub mod fixture;
pub mod harness;
pub mod schemas;
pub mod suite;

pub use error::AppError;
pub use fixture::{MockReqres, RunningFixture};
pub use harness::Harness;
