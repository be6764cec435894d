//! Run Scenario use case
//!
//! Drives one scenario through BUILD, SEND and ASSERT and produces its
//! verdict. Nothing here returns an error: a transport failure or a failed
//! check becomes a [`ScenarioFailure`] inside the outcome.

use std::sync::Arc;
use std::time::Instant;

use restcheck_domain::{
    Check, CheckResult, Expectations, FieldExpectation, Headers, JsonPath, ResponseSpec, Scenario,
    ScenarioFailure, ScenarioOutcome, SchemaRef,
};
use serde_json::Value;
use uuid::Uuid;

use crate::ports::{Clock, ExchangeContext, ExchangeObserver, HttpClient, SchemaValidator};

/// Use case for executing a single scenario.
///
/// # Example
///
/// ```ignore
/// let runner = RunScenario::new("https://reqres.in", client, schemas, clock)
///     .with_observer(Arc::new(TracingObserver::new()));
/// let outcome = runner.execute(&scenario).await;
/// assert!(outcome.passed(), "{outcome}");
/// ```
pub struct RunScenario {
    base_url: String,
    default_headers: Headers,
    client: Arc<dyn HttpClient>,
    schemas: Arc<dyn SchemaValidator>,
    clock: Arc<dyn Clock>,
    observers: Vec<Arc<dyn ExchangeObserver>>,
}

impl RunScenario {
    /// Creates a runner targeting `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        client: Arc<dyn HttpClient>,
        schemas: Arc<dyn SchemaValidator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            default_headers: Headers::new(),
            client,
            schemas,
            clock,
            observers: Vec::new(),
        }
    }

    /// Sets headers sent with every request.
    #[must_use]
    pub fn with_default_headers(mut self, headers: Headers) -> Self {
        self.default_headers = headers;
        self
    }

    /// Registers an observer. Observers are called in registration order.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ExchangeObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// The base URL requests are built against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds, sends and verifies `scenario`.
    pub async fn execute(&self, scenario: &Scenario) -> ScenarioOutcome {
        let start = Instant::now();
        let prepared = scenario
            .request()
            .prepare(&self.base_url, &self.default_headers);

        let ctx = ExchangeContext {
            id: Uuid::now_v7(),
            scenario: scenario.name().to_string(),
            started_at: self.clock.now(),
        };
        for observer in &self.observers {
            observer.on_request(&ctx, &prepared);
        }

        let (status, checks, failure) = match self.client.execute(&prepared).await {
            Ok(response) => {
                for observer in &self.observers {
                    observer.on_response(&ctx, &response);
                }
                let (checks, failure) = self.verify(scenario.expectations(), &response);
                (Some(response.status), checks, failure)
            }
            Err(error) => {
                for observer in &self.observers {
                    observer.on_transport_error(&ctx, &error);
                }
                (None, Vec::new(), Some(ScenarioFailure::Transport(error.to_string())))
            }
        };

        #[allow(clippy::cast_possible_truncation)]
        let outcome = ScenarioOutcome {
            scenario: ctx.scenario,
            method: prepared.method,
            url: prepared.url,
            status,
            checks,
            failure,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        match &outcome.failure {
            None => tracing::info!(scenario = %outcome.scenario, "scenario passed"),
            Some(failure) => tracing::warn!(
                scenario = %outcome.scenario,
                kind = failure.kind(),
                "scenario failed: {failure}"
            ),
        }
        outcome
    }

    /// Runs the checks of `expect` against `response` in their fixed order
    /// and stops at the first failure.
    #[must_use]
    pub fn verify(
        &self,
        expect: &Expectations,
        response: &ResponseSpec,
    ) -> (Vec<CheckResult>, Option<ScenarioFailure>) {
        let mut results = Vec::new();
        let mut body: Option<Value> = None;

        for check in expect.checks() {
            let verdict = match &check {
                Check::Status { expected } => check_status(*expected, response.status),
                Check::Schema { schema } => {
                    json_body(&mut body, response).and_then(|json| self.check_schema(schema, json))
                }
                Check::Field { path, expectation } => {
                    json_body(&mut body, response).and_then(|json| check_field(path, expectation, json))
                }
            };

            match verdict {
                Ok(actual) => results.push(CheckResult::pass_with_value(check, actual)),
                Err(failure) => {
                    let result = match &failure {
                        ScenarioFailure::StatusMismatch { actual, .. } => {
                            CheckResult::fail_with_value(check, actual.to_string(), failure.to_string())
                        }
                        ScenarioFailure::FieldMismatch { actual, .. } => {
                            CheckResult::fail_with_value(check, actual.clone(), failure.to_string())
                        }
                        _ => CheckResult::fail(check, failure.to_string()),
                    };
                    results.push(result);
                    return (results, Some(failure));
                }
            }
        }

        (results, None)
    }

    fn check_schema(&self, schema: &SchemaRef, json: &Value) -> Result<String, ScenarioFailure> {
        match self.schemas.violations(schema, json) {
            Ok(violations) if violations.is_empty() => Ok("valid".to_string()),
            Ok(violations) => Err(ScenarioFailure::SchemaViolation {
                schema: schema.name().to_string(),
                violations,
            }),
            Err(e) => Err(ScenarioFailure::SchemaUnavailable {
                schema: schema.name().to_string(),
                message: e.to_string(),
            }),
        }
    }
}

fn check_status(expected: u16, actual: u16) -> Result<String, ScenarioFailure> {
    if expected == actual {
        Ok(actual.to_string())
    } else {
        Err(ScenarioFailure::StatusMismatch { expected, actual })
    }
}

fn check_field(
    path: &JsonPath,
    expectation: &FieldExpectation,
    json: &Value,
) -> Result<String, ScenarioFailure> {
    let Some(actual) = path.select(json) else {
        return Err(ScenarioFailure::FieldMissing {
            path: path.to_string(),
            expected: expectation.description(),
        });
    };

    expectation
        .evaluate(&actual)
        .map(|()| actual.to_string())
        .map_err(|reason| ScenarioFailure::FieldMismatch {
            path: path.to_string(),
            expected: expectation.description(),
            actual: actual.to_string(),
            reason,
        })
}

/// Parses the body once and reuses it for the remaining checks.
fn json_body<'a>(
    cache: &'a mut Option<Value>,
    response: &ResponseSpec,
) -> Result<&'a Value, ScenarioFailure> {
    let parsed = match cache.take() {
        Some(value) => value,
        None => response
            .json()
            .map_err(|e| ScenarioFailure::UnreadableBody(e.to_string()))?,
    };
    Ok(cache.insert(parsed))
}
