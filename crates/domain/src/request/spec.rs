//! Request specification and the outbound request built from it

use serde::{Deserialize, Serialize};

use super::{Header, Headers, HttpMethod, QueryParam, QueryParams, RequestBody};

/// Declarative description of the request a scenario sends.
///
/// The path is relative to the harness base URL; a path that is already an
/// absolute `http(s)://` URL is used as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RequestSpec {
    /// HTTP method
    pub method: HttpMethod,
    /// Path, optionally carrying its own query string
    pub path: String,
    /// Extra query parameters
    #[serde(default)]
    pub query: QueryParams,
    /// Scenario specific headers
    #[serde(default)]
    pub headers: Headers,
    /// Request body
    #[serde(default)]
    pub body: RequestBody,
}

impl RequestSpec {
    /// Creates a request with the given method and path.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Self::default()
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.add(QueryParam::new(key, value));
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(Header::new(name, value));
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Builds the outbound request against `base_url`.
    ///
    /// Building never fails: an unusable URL is only detected when the
    /// request is sent. `default_headers` go first so that scenario headers
    /// can repeat them; `Content-Type` is added only when a body is present
    /// and the scenario did not set it.
    #[must_use]
    pub fn prepare(&self, base_url: &str, default_headers: &Headers) -> PreparedRequest {
        let mut url = if self.path.starts_with("http://") || self.path.starts_with("https://") {
            self.path.clone()
        } else {
            let base = base_url.trim_end_matches('/');
            if self.path.starts_with('/') {
                format!("{base}{}", self.path)
            } else {
                format!("{base}/{}", self.path)
            }
        };

        if !self.query.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&self.query.encode());
        }

        let mut headers: Headers = default_headers
            .iter()
            .chain(self.headers.iter())
            .cloned()
            .collect();
        if let Some(content_type) = self.body.content_type()
            && !headers.contains("content-type")
        {
            headers.add(Header::new("Content-Type", content_type));
        }

        PreparedRequest {
            method: self.method,
            url,
            headers,
            body: self.body.render(),
        }
    }
}

/// A fully built outbound request, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute target URL, not yet validated
    pub url: String,
    /// Headers in send order
    pub headers: Headers,
    /// Serialized body
    pub body: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prepare_joins_base_and_path() {
        let prepared = RequestSpec::get("/api/users/23").prepare("https://reqres.in/", &Headers::new());
        assert_eq!(prepared.url, "https://reqres.in/api/users/23");
        assert_eq!(prepared.method, HttpMethod::Get);
        assert!(prepared.headers.is_empty());
        assert_eq!(prepared.body, None);
    }

    #[test]
    fn test_prepare_adds_missing_slash() {
        let prepared = RequestSpec::get("api/users").prepare("http://localhost:8080", &Headers::new());
        assert_eq!(prepared.url, "http://localhost:8080/api/users");
    }

    #[test]
    fn test_prepare_appends_query() {
        let prepared = RequestSpec::get("/api/users")
            .with_query("page", "2")
            .prepare("https://reqres.in", &Headers::new());
        assert_eq!(prepared.url, "https://reqres.in/api/users?page=2");

        let prepared = RequestSpec::get("/api/users?delay=3")
            .with_query("page", "1")
            .prepare("https://reqres.in", &Headers::new());
        assert_eq!(prepared.url, "https://reqres.in/api/users?delay=3&page=1");
    }

    #[test]
    fn test_prepare_keeps_absolute_path() {
        let prepared = RequestSpec::get("http://other.host/x").prepare("https://reqres.in", &Headers::new());
        assert_eq!(prepared.url, "http://other.host/x");
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let prepared = RequestSpec::post("/api/register")
            .with_body(RequestBody::json([("email", "sydney@fife")]))
            .prepare("https://reqres.in", &Headers::new());

        assert_eq!(prepared.headers.get("Content-Type"), Some("application/json"));
        assert_eq!(prepared.body.as_deref(), Some(r#"{"email":"sydney@fife"}"#));
    }

    #[test]
    fn test_no_body_means_no_content_type() {
        let prepared = RequestSpec::post("/api/logout").prepare("https://reqres.in", &Headers::new());
        assert!(!prepared.headers.contains("content-type"));
    }

    #[test]
    fn test_explicit_content_type_is_not_duplicated() {
        let prepared = RequestSpec::post("/api/users")
            .with_header("content-type", "application/json; charset=utf-8")
            .with_body(RequestBody::json([("name", "Boris")]))
            .prepare("https://reqres.in", &Headers::new());

        assert_eq!(prepared.headers.len(), 1);
        assert_eq!(
            prepared.headers.get("Content-Type"),
            Some("application/json; charset=utf-8")
        );
    }

    #[test]
    fn test_default_headers_come_first() {
        let defaults: Headers = [Header::new("x-api-key", "reqres-free-v1")].into_iter().collect();
        let prepared = RequestSpec::get("/api/users")
            .with_header("Accept", "application/json")
            .prepare("https://reqres.in", &defaults);

        let names: Vec<_> = prepared.headers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["x-api-key", "Accept"]);
    }
}
