//! Integration tests running the reqres suite against the mock backend.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use restcheck::suite::{self, USERS_LIST_SCHEMA};
use restcheck::{Harness, MockReqres, RunningFixture};
use restcheck_domain::{RequestSpec, Scenario, ScenarioFailure};
use restcheck_infrastructure::HarnessConfig;
use serde_json::Value;

async fn fast_fixture() -> RunningFixture {
    MockReqres::new()
        .with_delay_unit(Duration::from_millis(10))
        .spawn()
        .await
        .expect("mock backend should start")
}

async fn harness(config: &HarnessConfig) -> Harness {
    Harness::with_fixture(config, fast_fixture().await).expect("harness should assemble")
}

#[tokio::test]
async fn test_full_suite_passes_against_fixture() {
    let harness = harness(&HarnessConfig::default()).await;
    assert!(harness.uses_fixture());
    assert!(harness.base_url().starts_with("http://127.0.0.1:"));

    let report = harness.run(&suite::scenarios().unwrap()).await.unwrap();

    for outcome in &report.outcomes {
        assert!(outcome.passed(), "{outcome}");
    }
    assert_eq!(report.total, 8);
    assert_eq!(report.passed, 8);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(harness.records().len(), 8);
}

#[tokio::test]
async fn test_each_scenario_records_its_checks() {
    let harness = harness(&HarnessConfig::default()).await;

    let outcome = harness
        .run(&[suite::list_users().unwrap()])
        .await
        .unwrap()
        .outcomes
        .remove(0);

    assert_eq!(outcome.status, Some(200));
    let actual: Vec<Option<String>> = outcome.checks.iter().map(|c| c.actual.clone()).collect();
    assert_eq!(
        actual,
        [
            Some("200".to_string()),
            Some("valid".to_string()),
            Some("6".to_string()),
            Some("12".to_string()),
            Some("\"rachel.howell@reqres.in\"".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_status_mismatch_stops_verification() {
    let harness = harness(&HarnessConfig::default()).await;
    let scenario = Scenario::builder("existing user", RequestSpec::get("/api/users/23"))
        .status(200)
        .field_not_null("data.id")
        .build()
        .unwrap();

    let report = harness.run(&[scenario]).await.unwrap();
    let outcome = &report.outcomes[0];

    assert_eq!(
        outcome.failure,
        Some(ScenarioFailure::StatusMismatch {
            expected: 200,
            actual: 404
        })
    );
    assert_eq!(outcome.checks.len(), 1);
    assert_eq!(report.exit_code(), 1);
}

#[tokio::test]
async fn test_missing_field_fails() {
    let harness = harness(&HarnessConfig::default()).await;
    let scenario = Scenario::builder("user has phone", RequestSpec::get("/api/users/2"))
        .field_not_null("data.phone")
        .build()
        .unwrap();

    let outcome = harness.run(&[scenario]).await.unwrap().outcomes.remove(0);

    assert_eq!(
        outcome.failure,
        Some(ScenarioFailure::FieldMissing {
            path: "data.phone".to_string(),
            expected: "is not null".to_string(),
        })
    );
}

#[tokio::test]
async fn test_wrong_value_reports_expected_and_actual() {
    let harness = harness(&HarnessConfig::default()).await;
    let scenario = Scenario::builder("wrong email", RequestSpec::get("/api/users").with_query("page", "2"))
        .field_eq("data[5].email", "george.bluth@reqres.in")
        .build()
        .unwrap();

    let outcome = harness.run(&[scenario]).await.unwrap().outcomes.remove(0);

    match outcome.failure {
        Some(ScenarioFailure::FieldMismatch { path, actual, .. }) => {
            assert_eq!(path, "data[5].email");
            assert_eq!(actual, "\"rachel.howell@reqres.in\"");
        }
        other => panic!("expected a field mismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn test_schema_violation_lists_constraints() {
    let harness = harness(&HarnessConfig::default()).await;
    let scenario = Scenario::builder("single user as list", RequestSpec::get("/api/users/2"))
        .schema(USERS_LIST_SCHEMA)
        .field_eq("data.id", 2)
        .build()
        .unwrap();

    let outcome = harness.run(&[scenario]).await.unwrap().outcomes.remove(0);

    match outcome.failure {
        Some(ScenarioFailure::SchemaViolation { schema, violations }) => {
            assert_eq!(schema, USERS_LIST_SCHEMA);
            assert!(violations.iter().any(|v| v.contains("page")), "{violations:?}");
        }
        other => panic!("expected a schema violation, got {other:?}"),
    }
    assert_eq!(outcome.checks.len(), 2);
}

#[tokio::test]
async fn test_transport_failure_is_a_verdict() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let config = HarnessConfig {
        base_url: format!("http://{addr}"),
        timeout_ms: Some(2_000),
        report_path: Some(dir.path().join("run.har")),
        ..HarnessConfig::default()
    };
    let harness = Harness::from_config(&config).await.unwrap();
    assert!(!harness.uses_fixture());

    let report = harness.run(&suite::scenarios().unwrap()).await.unwrap();

    assert_eq!(report.failed, 8);
    assert!(report.outcomes.iter().all(|o| o.status.is_none()));
    assert!(
        report
            .failures()
            .all(|o| o.failure.as_ref().is_some_and(ScenarioFailure::is_transport))
    );
    assert_eq!(report.exit_code(), 1);

    let har: Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("run.har")).unwrap()).unwrap();
    let entries = har["log"]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 8);
    assert!(entries.iter().all(|e| e["response"]["status"] == 0));
}

#[tokio::test]
async fn test_har_report_captures_exchanges() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reqres.har");
    let config = HarnessConfig {
        report_path: Some(path.clone()),
        ..HarnessConfig::default()
    };
    let harness = harness(&config).await;

    harness
        .run(&[suite::create_user().unwrap(), suite::user_not_found().unwrap()])
        .await
        .unwrap();

    let har: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let entries = &har["log"]["entries"];
    assert_eq!(entries[0]["pageref"], "create user");
    assert_eq!(entries[0]["request"]["method"], "POST");
    assert_eq!(entries[0]["response"]["status"], 201);
    assert_eq!(entries[1]["response"]["status"], 404);
}

#[tokio::test]
async fn test_api_key_is_sent_as_default_header() {
    let fixture = MockReqres::new()
        .require_api_key("reqres-free-v1")
        .with_delay_unit(Duration::from_millis(10))
        .spawn()
        .await
        .unwrap();
    let config = HarnessConfig {
        api_key: Some("reqres-free-v1".to_string()),
        ..HarnessConfig::default()
    };
    let keyed = Harness::with_fixture(&config, fixture).unwrap();

    let report = keyed.run(&suite::scenarios().unwrap()).await.unwrap();
    assert!(report.all_passed(), "{report}");
    assert!(
        keyed
            .records()
            .iter()
            .all(|r| r.request.headers.get("X-Api-Key") == Some("reqres-free-v1"))
    );

    let locked = MockReqres::new().require_api_key("reqres-free-v1").spawn().await.unwrap();
    let unkeyed = Harness::with_fixture(&HarnessConfig::default(), locked).unwrap();
    let outcome = unkeyed
        .run(&[suite::user_not_found().unwrap()])
        .await
        .unwrap()
        .outcomes
        .remove(0);
    assert_eq!(
        outcome.failure,
        Some(ScenarioFailure::StatusMismatch {
            expected: 404,
            actual: 401
        })
    );
}
