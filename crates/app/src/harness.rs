//! Wires configuration, adapters and observers into a suite runner.

use std::path::PathBuf;
use std::sync::Arc;

use restcheck_application::{ApplicationError, RunScenario, RunSuite};
use restcheck_domain::{Header, Headers, Scenario, SuiteReport};
use restcheck_infrastructure::{
    ExchangeRecord, ExchangeRecorder, HarExporter, HarnessConfig, ReqwestHttpClient, SystemClock,
    TracingObserver,
};

use crate::error::AppError;
use crate::fixture::{MockReqres, RunningFixture};
use crate::schemas::schema_store;
use crate::suite::SUITE_NAME;

/// Header reqres reads the API key from.
pub const API_KEY_HEADER: &str = "x-api-key";

/// A ready-to-run suite plus everything it records.
pub struct Harness {
    suite: RunSuite,
    recorder: Arc<ExchangeRecorder>,
    report_path: Option<PathBuf>,
    // Keeps the mock backend alive as long as the harness.
    fixture: Option<RunningFixture>,
}

impl Harness {
    /// Builds the harness described by `config`, starting the mock backend
    /// when `use_fixture` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend, HTTP client or schemas cannot be set up.
    pub async fn from_config(config: &HarnessConfig) -> Result<Self, AppError> {
        let fixture = if config.use_fixture {
            let mut mock = MockReqres::new();
            if let Some(key) = &config.api_key {
                mock = mock.require_api_key(key.clone());
            }
            Some(mock.spawn().await?)
        } else {
            None
        };
        Self::assemble(config, fixture)
    }

    /// Builds a harness that targets an already running backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or schemas cannot be set up.
    pub fn with_fixture(config: &HarnessConfig, fixture: RunningFixture) -> Result<Self, AppError> {
        Self::assemble(config, Some(fixture))
    }

    fn assemble(config: &HarnessConfig, fixture: Option<RunningFixture>) -> Result<Self, AppError> {
        let base_url = fixture
            .as_ref()
            .map_or_else(|| config.base_url.clone(), RunningFixture::base_url);

        let client = ReqwestHttpClient::with_timeout(config.timeout()).map_err(ApplicationError::from)?;
        let schemas = schema_store(config.schema_dir.as_deref()).map_err(ApplicationError::from)?;

        let mut default_headers = Headers::new();
        if let Some(key) = &config.api_key {
            default_headers.add(Header::new(API_KEY_HEADER, key.clone()));
        }

        let recorder = Arc::new(ExchangeRecorder::new());
        let runner = RunScenario::new(
            base_url,
            Arc::new(client),
            Arc::new(schemas),
            Arc::new(SystemClock::new()),
        )
        .with_default_headers(default_headers)
        .with_observer(Arc::new(TracingObserver::new()))
        .with_observer(recorder.clone());

        tracing::info!(
            base_url = runner.base_url(),
            fixture = fixture.is_some(),
            "harness ready"
        );

        Ok(Self {
            suite: RunSuite::new(SUITE_NAME, runner),
            recorder,
            report_path: config.report_path.clone(),
            fixture,
        })
    }

    /// The URL scenarios are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.suite.runner().base_url()
    }

    /// Whether the harness runs against its own mock backend.
    #[must_use]
    pub const fn uses_fixture(&self) -> bool {
        self.fixture.is_some()
    }

    /// Runs `scenarios` and writes the HAR report if one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error only if the report cannot be written; failing
    /// scenarios are part of the returned report.
    pub async fn run(&self, scenarios: &[Scenario]) -> Result<SuiteReport, AppError> {
        let report = self.suite.execute(scenarios).await;

        if let Some(path) = &self.report_path {
            HarExporter::write(&self.recorder.records(), path)?;
            tracing::info!(path = %path.display(), "HAR report written");
        }

        Ok(report)
    }

    /// Every exchange captured so far.
    #[must_use]
    pub fn records(&self) -> Vec<ExchangeRecord> {
        self.recorder.records()
    }
}
