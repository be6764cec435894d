//! Run Suite use case

use std::time::Instant;

use restcheck_domain::{Scenario, SuiteReport};

use super::RunScenario;

/// Runs a list of scenarios one after another and aggregates the verdicts.
///
/// Scenarios are independent: a failure is recorded and the next scenario
/// still runs.
pub struct RunSuite {
    name: String,
    runner: RunScenario,
}

impl RunSuite {
    /// Creates a suite runner.
    pub fn new(name: impl Into<String>, runner: RunScenario) -> Self {
        Self {
            name: name.into(),
            runner,
        }
    }

    /// The scenario runner used for each scenario.
    #[must_use]
    pub const fn runner(&self) -> &RunScenario {
        &self.runner
    }

    /// Executes every scenario in order.
    pub async fn execute(&self, scenarios: &[Scenario]) -> SuiteReport {
        let start = Instant::now();
        let mut outcomes = Vec::with_capacity(scenarios.len());

        for scenario in scenarios {
            outcomes.push(self.runner.execute(scenario).await);
        }

        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = start.elapsed().as_millis() as u64;
        let report = SuiteReport::new(&self.name, outcomes, duration_ms);
        tracing::info!(
            suite = %report.suite_name,
            passed = report.passed,
            failed = report.failed,
            "suite finished"
        );
        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ports::{Clock, HttpClient, HttpClientError, SchemaError, SchemaValidator};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;
    use restcheck_domain::{Headers, PreparedRequest, RequestSpec, ResponseSpec, SchemaRef};
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;

    /// Answers 404 for `/missing`, refuses `/down`, 200 otherwise.
    struct RoutingClient;

    #[async_trait]
    impl HttpClient for RoutingClient {
        async fn execute(&self, request: &PreparedRequest) -> Result<ResponseSpec, HttpClientError> {
            if request.url.ends_with("/down") {
                return Err(HttpClientError::ConnectionFailed("reset by peer".to_string()));
            }
            let status = if request.url.ends_with("/missing") { 404 } else { 200 };
            Ok(ResponseSpec::new(status, Headers::new(), b"{}", Duration::ZERO))
        }
    }

    struct NoSchemas;

    impl SchemaValidator for NoSchemas {
        fn violations(&self, schema: &SchemaRef, _instance: &Value) -> Result<Vec<String>, SchemaError> {
            Err(SchemaError::NotFound(schema.name().to_string()))
        }
    }

    struct EpochClock;

    impl Clock for EpochClock {
        fn now(&self) -> DateTime<Utc> {
            DateTime::UNIX_EPOCH
        }
    }

    fn scenario(name: &str, path: &str, status: u16) -> Scenario {
        Scenario::builder(name, RequestSpec::get(path))
            .status(status)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_suite() {
        let runner = RunScenario::new(
            "http://fixture.local",
            Arc::new(RoutingClient),
            Arc::new(NoSchemas),
            Arc::new(EpochClock),
        );
        let suite = RunSuite::new("smoke", runner);

        let report = suite
            .execute(&[
                scenario("down", "/down", 200),
                scenario("wrong status", "/missing", 200),
                scenario("ok", "/ok", 200),
                scenario("not found", "/missing", 404),
            ])
            .await;

        assert_eq!(report.total, 4);
        assert_eq!(report.passed, 2);
        assert_eq!(report.failed, 2);
        assert_eq!(report.exit_code(), 1);

        let names: Vec<_> = report.outcomes.iter().map(|o| o.scenario.as_str()).collect();
        assert_eq!(names, vec!["down", "wrong status", "ok", "not found"]);
        assert!(report.outcomes[0].failure.as_ref().is_some_and(|f| f.is_transport()));
    }

    #[tokio::test]
    async fn test_empty_suite() {
        let runner = RunScenario::new(
            "http://fixture.local",
            Arc::new(RoutingClient),
            Arc::new(NoSchemas),
            Arc::new(EpochClock),
        );
        let report = RunSuite::new("empty", runner).execute(&[]).await;
        assert!(report.all_passed());
        assert_eq!(report.exit_code(), 0);
    }
}
