//! HTTP Client port

use async_trait::async_trait;
use restcheck_domain::{PreparedRequest, ResponseSpec};
use thiserror::Error;

/// Transport-level failures: no HTTP response was obtained.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// The request URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request did not complete in time.
    #[error("request timed out{}", .timeout_ms.map(|ms| format!(" after {ms}ms")).unwrap_or_default())]
    Timeout {
        /// Configured timeout in milliseconds, if the harness set one.
        timeout_ms: Option<u64>,
    },

    /// The host name could not be resolved.
    #[error("could not resolve host '{host}': {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Connecting failed for another reason (TLS, reset, ...).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was exceeded.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// Any other transport error.
    #[error("{0}")]
    Other(String),
}

/// Port for sending one prepared request.
///
/// Implementations must not retry: a failure is reported once, as is.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends the request and reads the complete response.
    ///
    /// # Errors
    ///
    /// Returns an [`HttpClientError`] when no response could be obtained.
    async fn execute(&self, request: &PreparedRequest) -> Result<ResponseSpec, HttpClientError>;
}
