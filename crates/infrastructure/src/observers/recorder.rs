//! Observer that keeps every exchange of a run in memory.
//!
//! The recorder is shared between the runner (as an observer) and the
//! caller, which reads the records back once the suite has finished.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use restcheck_application::ports::{ExchangeContext, ExchangeObserver, HttpClientError};
use restcheck_domain::{PreparedRequest, ResponseSpec};
use serde::Serialize;
use uuid::Uuid;

/// One captured request together with what came back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeRecord {
    /// Exchange id.
    pub id: Uuid,
    /// Scenario that issued the request.
    pub scenario: String,
    /// When the request was handed to the transport.
    pub started_at: DateTime<Utc>,
    /// The request as sent.
    pub request: PreparedRequest,
    /// The response, if one arrived.
    pub response: Option<ResponseSpec>,
    /// The transport error, if the request never got a response.
    pub error: Option<String>,
}

/// Thread-safe in-memory exchange log.
#[derive(Debug, Default)]
pub struct ExchangeRecorder {
    records: Mutex<Vec<ExchangeRecord>>,
}

impl ExchangeRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all records, in request order.
    #[must_use]
    pub fn records(&self) -> Vec<ExchangeRecord> {
        self.records.lock().clone()
    }

    /// Number of captured exchanges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns true if nothing has been captured yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    fn complete(&self, id: Uuid, apply: impl FnOnce(&mut ExchangeRecord)) {
        let mut records = self.records.lock();
        if let Some(record) = records.iter_mut().rev().find(|r| r.id == id) {
            apply(record);
        }
    }
}

impl ExchangeObserver for ExchangeRecorder {
    fn on_request(&self, ctx: &ExchangeContext, request: &PreparedRequest) {
        self.records.lock().push(ExchangeRecord {
            id: ctx.id,
            scenario: ctx.scenario.clone(),
            started_at: ctx.started_at,
            request: request.clone(),
            response: None,
            error: None,
        });
    }

    fn on_response(&self, ctx: &ExchangeContext, response: &ResponseSpec) {
        self.complete(ctx.id, |record| record.response = Some(response.clone()));
    }

    fn on_transport_error(&self, ctx: &ExchangeContext, error: &HttpClientError) {
        self.complete(ctx.id, |record| record.error = Some(error.to_string()));
    }
}
