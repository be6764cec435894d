//! Exchange observer port (reporting hook)

use chrono::{DateTime, Utc};
use restcheck_domain::{PreparedRequest, ResponseSpec};
use uuid::Uuid;

use super::HttpClientError;

/// Identifies one request/response exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeContext {
    /// Unique id shared by the callbacks of one exchange.
    pub id: Uuid,
    /// Scenario that issued the request.
    pub scenario: String,
    /// When the request was handed to the transport.
    pub started_at: DateTime<Utc>,
}

/// Observer invoked around send and receive.
///
/// Observers only get shared references: they can record or log an
/// exchange but cannot change it or influence the verdict. All callbacks
/// default to doing nothing.
pub trait ExchangeObserver: Send + Sync {
    /// Called right before the request is sent.
    fn on_request(&self, _ctx: &ExchangeContext, _request: &PreparedRequest) {}

    /// Called once the full response has been read, before any check runs.
    fn on_response(&self, _ctx: &ExchangeContext, _response: &ResponseSpec) {}

    /// Called instead of `on_response` when the transport failed.
    fn on_transport_error(&self, _ctx: &ExchangeContext, _error: &HttpClientError) {}
}
