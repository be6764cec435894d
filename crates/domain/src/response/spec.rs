//! Response specification type

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::request::Headers;

/// HTTP response as received for one scenario execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSpec {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Response body as text
    pub body: String,
    /// Time from send to fully read body
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

impl ResponseSpec {
    /// Creates a response from raw parts. Invalid UTF-8 is replaced.
    #[must_use]
    pub fn new(status: u16, headers: Headers, body: &[u8], duration: Duration) -> Self {
        Self {
            status,
            headers,
            body: String::from_utf8_lossy(body).into_owned(),
            duration,
        }
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the parser error if the body is not valid JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Returns the `Content-Type` header, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type")
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::request::Header;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_body() {
        let headers: Headers = [Header::new("Content-Type", "application/json; charset=utf-8")]
            .into_iter()
            .collect();
        let response = ResponseSpec::new(200, headers, br#"{"id": 4}"#, Duration::from_millis(12));

        assert!(response.is_success());
        assert_eq!(response.json().unwrap()["id"], 4);
        assert_eq!(response.content_type(), Some("application/json; charset=utf-8"));
    }

    #[test]
    fn test_non_json_body() {
        let response = ResponseSpec::new(404, Headers::new(), b"Not Found", Duration::ZERO);
        assert!(!response.is_success());
        assert!(response.json().is_err());
    }

    #[test]
    fn test_duration_serializes_as_millis() {
        let response = ResponseSpec::new(204, Headers::new(), b"", Duration::from_millis(1500));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["duration"], 1500);
    }
}
