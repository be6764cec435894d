//! Verification vocabulary: expectations, check results and verdicts.
//!
//! A scenario is verified by a fixed sequence of [`Check`]s. Each check
//! yields a [`CheckResult`]; the first failing one becomes the scenario's
//! [`ScenarioFailure`]. Outcomes of a whole run are aggregated into a
//! [`SuiteReport`].

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::{DomainError, DomainResult};
use crate::json_path::JsonPath;
use crate::request::HttpMethod;
use crate::scenario::SchemaRef;

/// What the value selected by a JSON path must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldExpectation {
    /// Deep equality with a JSON value.
    Equals(Value),
    /// Present and not `null`.
    NotNull,
    /// Array, object or string of exactly this length.
    HasSize(usize),
    /// String matching a regular expression.
    Matches(String),
}

impl FieldExpectation {
    /// Human-readable form used in reports.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Equals(value) => format!("== {value}"),
            Self::NotNull => "is not null".to_string(),
            Self::HasSize(size) => format!("has size {size}"),
            Self::Matches(pattern) => format!("matches /{pattern}/"),
        }
    }

    /// Rejects expectations that can never be evaluated.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPattern`] for a regex that does not compile.
    pub fn validate(&self) -> DomainResult<()> {
        match self {
            Self::Matches(pattern) => Regex::new(pattern).map(|_| ()).map_err(|e| {
                DomainError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                }
            }),
            _ => Ok(()),
        }
    }

    /// Checks `actual`, returning the failure reason on mismatch.
    ///
    /// # Errors
    ///
    /// Returns a message describing why `actual` does not satisfy the
    /// expectation.
    pub fn evaluate(&self, actual: &Value) -> Result<(), String> {
        match self {
            Self::Equals(expected) => {
                if actual == expected {
                    Ok(())
                } else {
                    Err(format!("expected {expected}, got {actual}"))
                }
            }
            Self::NotNull => {
                if actual.is_null() {
                    Err("expected a non-null value, got null".to_string())
                } else {
                    Ok(())
                }
            }
            Self::HasSize(expected) => {
                let size = match actual {
                    Value::Array(items) => items.len(),
                    Value::Object(map) => map.len(),
                    Value::String(s) => s.chars().count(),
                    other => return Err(format!("expected a sized value, got {other}")),
                };
                if size == *expected {
                    Ok(())
                } else {
                    Err(format!("expected size {expected}, got {size}"))
                }
            }
            Self::Matches(pattern) => {
                let regex = Regex::new(pattern)
                    .map_err(|e| format!("invalid regex pattern '{pattern}': {e}"))?;
                match actual {
                    Value::String(s) if regex.is_match(s) => Ok(()),
                    Value::String(s) => Err(format!("'{s}' does not match /{pattern}/")),
                    other => Err(format!("expected a string, got {other}")),
                }
            }
        }
    }
}

/// One verification step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Check {
    /// Status code equality.
    Status {
        /// Expected status code.
        expected: u16,
    },
    /// Body conforms to a JSON schema.
    Schema {
        /// Schema to validate against.
        schema: SchemaRef,
    },
    /// Value at a JSON path satisfies an expectation.
    Field {
        /// Path into the body.
        path: JsonPath,
        /// Expectation on the selected value.
        expectation: FieldExpectation,
    },
}

impl Check {
    /// Human-readable description of this check.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Status { expected } => format!("Status code = {expected}"),
            Self::Schema { schema } => format!("Body matches schema '{schema}'"),
            Self::Field { path, expectation } => {
                format!("JSON {path} {}", expectation.description())
            }
        }
    }
}

/// Result of running a single check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// The check that was run.
    pub check: Check,
    /// Whether the check passed.
    pub passed: bool,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl CheckResult {
    /// Create a passed result.
    #[must_use]
    pub fn pass(check: Check) -> Self {
        Self {
            check,
            passed: true,
            actual: None,
            error: None,
        }
    }

    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(check: Check, actual: impl Into<String>) -> Self {
        Self {
            check,
            passed: true,
            actual: Some(actual.into()),
            error: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(check: Check, error: impl Into<String>) -> Self {
        Self {
            check,
            passed: false,
            actual: None,
            error: Some(error.into()),
        }
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(check: Check, actual: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            check,
            passed: false,
            actual: Some(actual.into()),
            error: Some(error.into()),
        }
    }
}

/// Why a scenario failed.
///
/// Transport failures are kept apart from assertion failures: the former
/// mean no response was observed at all.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ScenarioFailure {
    /// The response status differs from the expected one.
    #[error("expected status {expected}, got {actual}")]
    StatusMismatch {
        /// Expected status code.
        expected: u16,
        /// Received status code.
        actual: u16,
    },

    /// The body does not validate against the referenced schema.
    #[error("body does not match schema '{schema}': {}", .violations.join("; "))]
    SchemaViolation {
        /// Schema name.
        schema: String,
        /// Violated constraints, `instance path: message`.
        violations: Vec<String>,
    },

    /// The referenced schema could not be loaded or compiled.
    #[error("schema '{schema}' is unavailable: {message}")]
    SchemaUnavailable {
        /// Schema name.
        schema: String,
        /// Loader error.
        message: String,
    },

    /// The value at a path does not satisfy its expectation.
    #[error("field '{path}': {reason}")]
    FieldMismatch {
        /// JSON path.
        path: String,
        /// Expected value or condition.
        expected: String,
        /// Actual value.
        actual: String,
        /// Mismatch explanation.
        reason: String,
    },

    /// The path selects nothing in the body.
    #[error("field '{path}' is missing (expected {expected})")]
    FieldMissing {
        /// JSON path.
        path: String,
        /// Expected value or condition.
        expected: String,
    },

    /// Schema or field checks were requested but the body is not JSON.
    #[error("response body is not JSON: {0}")]
    UnreadableBody(String),

    /// No response was received.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl ScenarioFailure {
    /// Short machine-friendly category name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::StatusMismatch { .. } => "status",
            Self::SchemaViolation { .. } | Self::SchemaUnavailable { .. } => "schema",
            Self::FieldMismatch { .. } | Self::FieldMissing { .. } => "field",
            Self::UnreadableBody(_) => "body",
            Self::Transport(_) => "transport",
        }
    }

    /// Returns true if the failure happened before any response arrived.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Verdict of one scenario execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Scenario name.
    pub scenario: String,
    /// Method that was sent.
    pub method: HttpMethod,
    /// URL that was sent.
    pub url: String,
    /// Received status, absent on transport failure.
    pub status: Option<u16>,
    /// Checks in the order they ran.
    pub checks: Vec<CheckResult>,
    /// First failure, if any.
    pub failure: Option<ScenarioFailure>,
    /// Wall time of the whole scenario in milliseconds.
    pub duration_ms: u64,
}

impl ScenarioOutcome {
    /// Returns true if every check passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.failure.is_none()
    }

    /// Converts the verdict into a `Result` for use in test functions.
    ///
    /// # Errors
    ///
    /// Returns the recorded failure.
    pub fn ensure_passed(&self) -> Result<(), ScenarioFailure> {
        self.failure.clone().map_or(Ok(()), Err)
    }
}

impl fmt::Display for ScenarioOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.failure {
            None => write!(f, "PASS {} ({} {})", self.scenario, self.method, self.url),
            Some(failure) => write!(
                f,
                "FAIL {} ({} {}): [{}] {}",
                self.scenario,
                self.method,
                self.url,
                failure.kind(),
                failure
            ),
        }
    }
}

/// Aggregate result of a run over many scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Suite name.
    pub suite_name: String,
    /// Per-scenario outcomes in execution order.
    pub outcomes: Vec<ScenarioOutcome>,
    /// Number of scenarios.
    pub total: usize,
    /// Number of passed scenarios.
    pub passed: usize,
    /// Number of failed scenarios.
    pub failed: usize,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl SuiteReport {
    /// Create a report from outcomes.
    #[must_use]
    pub fn new(suite_name: impl Into<String>, outcomes: Vec<ScenarioOutcome>, duration_ms: u64) -> Self {
        let total = outcomes.len();
        let passed = outcomes.iter().filter(|o| o.passed()).count();

        Self {
            suite_name: suite_name.into(),
            outcomes,
            total,
            passed,
            failed: total - passed,
            duration_ms,
        }
    }

    /// Check if all scenarios passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Get pass rate as percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// Process exit code: 0 when all passed, 1 otherwise.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        if self.all_passed() { 0 } else { 1 }
    }

    /// Iterates over failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            writeln!(f, "{outcome}")?;
        }
        write!(
            f,
            "{}: {} passed, {} failed, {} total ({:.1}%) in {}ms",
            self.suite_name,
            self.passed,
            self.failed,
            self.total,
            self.pass_rate(),
            self.duration_ms
        )
    }
}
