//! HTTP Archive (HAR) format exporter.
//!
//! Exports recorded exchanges to HAR 1.2 format.

use std::path::Path;

use restcheck_domain::{Headers, PreparedRequest, ResponseSpec};
use serde::Serialize;
use url::Url;

use super::ExportError;
use crate::observers::ExchangeRecord;

/// HAR format exporter.
pub struct HarExporter;

impl HarExporter {
    /// Renders the records as a pretty-printed HAR document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export(records: &[ExchangeRecord]) -> Result<String, ExportError> {
        let har = Har {
            log: HarLog {
                version: "1.2".to_string(),
                creator: HarCreator {
                    name: "restcheck".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
                entries: records.iter().map(Self::create_entry).collect(),
            },
        };

        serde_json::to_string_pretty(&har).map_err(|e| ExportError::Serialization(e.to_string()))
    }

    /// Renders the records and writes them to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write(records: &[ExchangeRecord], path: &Path) -> Result<(), ExportError> {
        let content = Self::export(records)?;
        std::fs::write(path, content).map_err(|e| ExportError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn create_entry(record: &ExchangeRecord) -> HarEntry {
        let response = record
            .response
            .as_ref()
            .map_or_else(|| HarResponse::failed(record.error.as_deref()), Self::build_response);

        let time_ms = record
            .response
            .as_ref()
            .map_or(0, |r| r.duration.as_millis() as i64);

        HarEntry {
            pageref: record.scenario.clone(),
            started_date_time: record.started_at.to_rfc3339(),
            time: time_ms,
            request: Self::build_request(&record.request),
            response,
            cache: HarCache {},
            timings: HarTimings {
                send: 0,
                wait: time_ms,
                receive: 0,
            },
            comment: record.error.clone(),
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn build_request(request: &PreparedRequest) -> HarRequest {
        let query_string = Url::parse(&request.url)
            .map(|url| {
                url.query_pairs()
                    .map(|(name, value)| HarQueryParam {
                        name: name.into_owned(),
                        value: value.into_owned(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let post_data = request.body.as_ref().map(|text| HarPostData {
            mime_type: request
                .headers
                .get("content-type")
                .unwrap_or_default()
                .to_string(),
            text: text.clone(),
        });

        HarRequest {
            method: request.method.as_str().to_string(),
            url: request.url.clone(),
            http_version: "HTTP/1.1".to_string(),
            headers: har_headers(&request.headers),
            query_string,
            post_data,
            headers_size: -1,
            body_size: request.body.as_ref().map_or(-1, |b| b.len() as i64),
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn build_response(response: &ResponseSpec) -> HarResponse {
        let size = response.body.len() as i64;
        HarResponse {
            status: i32::from(response.status),
            status_text: String::new(),
            http_version: "HTTP/1.1".to_string(),
            headers: har_headers(&response.headers),
            content: HarContent {
                size,
                mime_type: response.content_type().unwrap_or_default().to_string(),
                text: Some(response.body.clone()),
            },
            redirect_url: String::new(),
            headers_size: -1,
            body_size: size,
        }
    }
}

fn har_headers(headers: &Headers) -> Vec<HarHeader> {
    headers
        .redacted()
        .iter()
        .map(|h| HarHeader {
            name: h.name.clone(),
            value: h.value.clone(),
        })
        .collect()
}

// HAR format structs

#[derive(Serialize)]
struct Har {
    log: HarLog,
}

#[derive(Serialize)]
struct HarLog {
    version: String,
    creator: HarCreator,
    entries: Vec<HarEntry>,
}

#[derive(Serialize)]
struct HarCreator {
    name: String,
    version: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HarEntry {
    pageref: String,
    started_date_time: String,
    time: i64,
    request: HarRequest,
    response: HarResponse,
    cache: HarCache,
    timings: HarTimings,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HarRequest {
    method: String,
    url: String,
    http_version: String,
    headers: Vec<HarHeader>,
    query_string: Vec<HarQueryParam>,
    #[serde(skip_serializing_if = "Option::is_none")]
    post_data: Option<HarPostData>,
    headers_size: i64,
    body_size: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HarResponse {
    status: i32,
    status_text: String,
    http_version: String,
    headers: Vec<HarHeader>,
    content: HarContent,
    redirect_url: String,
    headers_size: i64,
    body_size: i64,
}

impl HarResponse {
    /// HAR has no slot for "no response"; status 0 marks it.
    fn failed(error: Option<&str>) -> Self {
        Self {
            status: 0,
            status_text: error.unwrap_or_default().to_string(),
            http_version: "HTTP/1.1".to_string(),
            headers: Vec::new(),
            content: HarContent {
                size: 0,
                mime_type: String::new(),
                text: None,
            },
            redirect_url: String::new(),
            headers_size: -1,
            body_size: -1,
        }
    }
}

#[derive(Serialize)]
struct HarHeader {
    name: String,
    value: String,
}

#[derive(Serialize)]
struct HarQueryParam {
    name: String,
    value: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HarPostData {
    mime_type: String,
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HarContent {
    size: i64,
    mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
struct HarCache {}

#[derive(Serialize)]
struct HarTimings {
    send: i64,
    wait: i64,
    receive: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;
    use restcheck_domain::{Header, HttpMethod};
    use serde_json::Value;
    use std::time::Duration;
    use uuid::Uuid;

    fn record(url: &str, body: Option<&str>, response: Option<ResponseSpec>) -> ExchangeRecord {
        let mut headers = Headers::new();
        if body.is_some() {
            headers.add(Header::new("Content-Type", "application/json"));
        }
        ExchangeRecord {
            id: Uuid::now_v7(),
            scenario: "scenario".to_string(),
            started_at: DateTime::UNIX_EPOCH,
            request: PreparedRequest {
                method: if body.is_some() { HttpMethod::Post } else { HttpMethod::Get },
                url: url.to_string(),
                headers,
                body: body.map(ToString::to_string),
            },
            error: response.is_none().then(|| "connection refused by reqres.in:443".to_string()),
            response,
        }
    }

    #[test]
    fn test_export_request_and_response() {
        let response = ResponseSpec::new(
            200,
            [Header::new("content-type", "application/json")].into_iter().collect(),
            br#"{"page":2}"#,
            Duration::from_millis(40),
        );
        let har = HarExporter::export(&[record(
            "https://reqres.in/api/users?page=2",
            None,
            Some(response),
        )])
        .unwrap();
        let har: Value = serde_json::from_str(&har).unwrap();

        assert_eq!(har["log"]["version"], "1.2");
        let entry = &har["log"]["entries"][0];
        assert_eq!(entry["pageref"], "scenario");
        assert_eq!(entry["time"], 40);
        assert_eq!(entry["request"]["method"], "GET");
        assert_eq!(entry["request"]["queryString"][0]["name"], "page");
        assert_eq!(entry["request"]["queryString"][0]["value"], "2");
        assert_eq!(entry["response"]["status"], 200);
        assert_eq!(entry["response"]["content"]["mimeType"], "application/json");
        assert_eq!(entry["response"]["content"]["text"], r#"{"page":2}"#);
        assert!(entry.get("comment").is_none());
    }

    #[test]
    fn test_export_post_data() {
        let har = HarExporter::export(&[record(
            "https://reqres.in/api/users",
            Some(r#"{"name":"morpheus","job":"leader"}"#),
            Some(ResponseSpec::new(201, Headers::new(), b"{}", Duration::ZERO)),
        )])
        .unwrap();
        let har: Value = serde_json::from_str(&har).unwrap();

        let request = &har["log"]["entries"][0]["request"];
        assert_eq!(request["method"], "POST");
        assert_eq!(request["postData"]["mimeType"], "application/json");
        assert_eq!(request["bodySize"], 34);
    }

    #[test]
    fn test_export_redacts_api_key() {
        let mut record = record("https://reqres.in/api/users/2", None, None);
        record.request.headers.add(Header::new("x-api-key", "reqres-free-v1"));

        let har = HarExporter::export(&[record]).unwrap();

        assert!(!har.contains("reqres-free-v1"));
        let har: Value = serde_json::from_str(&har).unwrap();
        let header = &har["log"]["entries"][0]["request"]["headers"][0];
        assert_eq!(header["name"], "x-api-key");
        assert_eq!(header["value"], "[REDACTED]");
    }

    #[test]
    fn test_export_transport_failure() {
        let har = HarExporter::export(&[record("https://reqres.in/api/users/2", None, None)]).unwrap();
        let har: Value = serde_json::from_str(&har).unwrap();

        let entry = &har["log"]["entries"][0];
        assert_eq!(entry["response"]["status"], 0);
        assert_eq!(entry["comment"], "connection refused by reqres.in:443");
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.har");

        HarExporter::write(&[], &path).unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["log"]["entries"], Value::Array(Vec::new()));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.har");
        assert!(matches!(HarExporter::write(&[], &path), Err(ExportError::Io { .. })));
    }
}
