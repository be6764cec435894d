//! Restcheck Domain - Scenario and verification types
//!
//! This crate defines what a contract scenario is, how its request is
//! built, and how the verdict of running it is represented.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod json_path;
pub mod request;
pub mod response;
pub mod scenario;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use json_path::{JsonPath, PathSegment};
pub use request::{
    Header, Headers, HttpMethod, PreparedRequest, QueryParam, QueryParams, REDACTED,
    RequestBody, RequestSpec, SENSITIVE_HEADERS,
};
pub use response::ResponseSpec;
pub use scenario::{Expectations, FieldAssertion, Scenario, SchemaRef};
pub use testing::{
    Check, CheckResult, FieldExpectation, ScenarioFailure, ScenarioOutcome, SuiteReport,
};
