//! Observer that writes every exchange to the `tracing` log.

use restcheck_application::ports::{ExchangeContext, ExchangeObserver, HttpClientError};
use restcheck_domain::{Headers, PreparedRequest, ResponseSpec};

/// Logs requests and responses at `info`, transport errors at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TracingObserver {
    /// Creates a new tracing observer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn render_headers(headers: &Headers) -> String {
    headers
        .redacted()
        .iter()
        .map(|h| format!("{}: {}", h.name, h.value))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ExchangeObserver for TracingObserver {
    fn on_request(&self, ctx: &ExchangeContext, request: &PreparedRequest) {
        tracing::info!(
            exchange = %ctx.id,
            scenario = %ctx.scenario,
            method = %request.method,
            uri = %request.url,
            headers = %render_headers(&request.headers),
            body = request.body.as_deref().unwrap_or(""),
            "request"
        );
    }

    fn on_response(&self, ctx: &ExchangeContext, response: &ResponseSpec) {
        #[allow(clippy::cast_possible_truncation)]
        let elapsed_ms = response.duration.as_millis() as u64;
        tracing::info!(
            exchange = %ctx.id,
            scenario = %ctx.scenario,
            status = response.status,
            elapsed_ms,
            headers = %render_headers(&response.headers),
            body = %response.body,
            "response"
        );
    }

    fn on_transport_error(&self, ctx: &ExchangeContext, error: &HttpClientError) {
        tracing::warn!(
            exchange = %ctx.id,
            scenario = %ctx.scenario,
            error = %error,
            "transport error"
        );
    }
}
