//! Scenario definitions.
//!
//! A [`Scenario`] pairs one request with the expectations its response must
//! meet. Scenarios are built once with [`ScenarioBuilder`] and are immutable
//! afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DomainResult;
use crate::json_path::JsonPath;
use crate::request::RequestSpec;
use crate::testing::{Check, FieldExpectation};

/// Name of a JSON Schema document, resolved by the schema store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRef(String);

impl SchemaRef {
    /// Creates a reference from a document name, e.g. `users_list_schema.json`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The document name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An expectation on the value at one JSON path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAssertion {
    /// Path into the response body.
    pub path: JsonPath,
    /// What the selected value must satisfy.
    pub expectation: FieldExpectation,
}

/// Everything a response must satisfy, checked in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expectations {
    /// Expected status code.
    pub status: u16,
    /// Optional schema the body must validate against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaRef>,
    /// Field assertions.
    #[serde(default)]
    pub fields: Vec<FieldAssertion>,
}

impl Expectations {
    /// The checks to run, in their fixed order: status, schema, fields.
    #[must_use]
    pub fn checks(&self) -> Vec<Check> {
        let mut checks = Vec::with_capacity(2 + self.fields.len());
        checks.push(Check::Status {
            expected: self.status,
        });
        if let Some(schema) = &self.schema {
            checks.push(Check::Schema {
                schema: schema.clone(),
            });
        }
        checks.extend(self.fields.iter().map(|f| Check::Field {
            path: f.path.clone(),
            expectation: f.expectation.clone(),
        }));
        checks
    }

    /// Returns true if verification needs the body parsed as JSON.
    #[must_use]
    pub fn needs_json(&self) -> bool {
        self.schema.is_some() || !self.fields.is_empty()
    }
}

/// One independent request/assert test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    name: String,
    request: RequestSpec,
    expect: Expectations,
}

impl Scenario {
    /// Starts building a scenario.
    #[must_use]
    pub fn builder(name: impl Into<String>, request: RequestSpec) -> ScenarioBuilder {
        ScenarioBuilder {
            name: name.into(),
            request,
            status: 200,
            schema: None,
            fields: Vec::new(),
        }
    }

    /// Scenario name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Request to send.
    #[must_use]
    pub const fn request(&self) -> &RequestSpec {
        &self.request
    }

    /// Expectations on the response.
    #[must_use]
    pub const fn expectations(&self) -> &Expectations {
        &self.expect
    }
}

/// Builder for [`Scenario`].
///
/// Paths are parsed at [`build`](Self::build) time so that authoring reads
/// as a flat chain. The expected status defaults to 200.
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    name: String,
    request: RequestSpec,
    status: u16,
    schema: Option<SchemaRef>,
    fields: Vec<(String, FieldExpectation)>,
}

impl ScenarioBuilder {
    /// Sets the expected status code.
    #[must_use]
    pub const fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Requires the body to validate against the named schema.
    #[must_use]
    pub fn schema(mut self, name: impl Into<String>) -> Self {
        self.schema = Some(SchemaRef::new(name));
        self
    }

    /// Requires the value at `path` to equal `expected`.
    #[must_use]
    pub fn field_eq(self, path: impl Into<String>, expected: impl Into<Value>) -> Self {
        self.field(path, FieldExpectation::Equals(expected.into()))
    }

    /// Requires the value at `path` to be present and non-null.
    #[must_use]
    pub fn field_not_null(self, path: impl Into<String>) -> Self {
        self.field(path, FieldExpectation::NotNull)
    }

    /// Requires the value at `path` to have `size` elements.
    #[must_use]
    pub fn field_size(self, path: impl Into<String>, size: usize) -> Self {
        self.field(path, FieldExpectation::HasSize(size))
    }

    /// Requires the string at `path` to match `pattern`.
    #[must_use]
    pub fn field_matches(self, path: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.field(path, FieldExpectation::Matches(pattern.into()))
    }

    /// Adds an arbitrary field expectation.
    #[must_use]
    pub fn field(mut self, path: impl Into<String>, expectation: FieldExpectation) -> Self {
        self.fields.push((path.into(), expectation));
        self
    }

    /// Finishes the scenario.
    ///
    /// # Errors
    ///
    /// Returns the first path that fails to parse or pattern that fails
    /// to compile.
    pub fn build(self) -> DomainResult<Scenario> {
        let fields = self
            .fields
            .into_iter()
            .map(|(path, expectation)| {
                expectation.validate()?;
                Ok(FieldAssertion {
                    path: JsonPath::parse(&path)?,
                    expectation,
                })
            })
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Scenario {
            name: self.name,
            request: self.request,
            expect: Expectations {
                status: self.status,
                schema: self.schema,
                fields,
            },
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use crate::request::RequestBody;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_builder_defaults() {
        let scenario = Scenario::builder("user not found", RequestSpec::get("/api/users/23"))
            .build()
            .unwrap();

        assert_eq!(scenario.name(), "user not found");
        assert_eq!(scenario.expectations().status, 200);
        assert!(!scenario.expectations().needs_json());
    }

    #[test]
    fn test_checks_order_is_status_schema_fields() {
        let scenario = Scenario::builder("list users", RequestSpec::get("/api/users").with_query("page", "2"))
            .field_eq("per_page", 6)
            .schema("users_list_schema.json")
            .field_eq("total", 12)
            .status(200)
            .build()
            .unwrap();

        let kinds: Vec<String> = scenario
            .expectations()
            .checks()
            .iter()
            .map(Check::description)
            .collect();
        assert_eq!(
            kinds,
            vec![
                "Status code = 200".to_string(),
                "Body matches schema 'users_list_schema.json'".to_string(),
                "JSON per_page == 6".to_string(),
                "JSON total == 12".to_string(),
            ]
        );
    }

    #[test]
    fn test_build_rejects_bad_path() {
        let err = Scenario::builder("bad", RequestSpec::get("/"))
            .field_not_null("data..id")
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidJsonPath { .. }));
    }

    #[test]
    fn test_build_rejects_bad_pattern() {
        let err = Scenario::builder("login", RequestSpec::post("/api/login"))
            .field_matches("token", "[A-Za-z0-9")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidPattern { ref pattern, .. } if pattern == "[A-Za-z0-9"
        ));

        assert!(
            Scenario::builder("login", RequestSpec::post("/api/login"))
                .field_matches("token", r"^[A-Za-z0-9]{17}$")
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_scenario_round_trips_through_json() {
        let scenario = Scenario::builder(
            "create user",
            RequestSpec::post("/api/users").with_body(RequestBody::json([("name", "Boris"), ("job", "QA")])),
        )
        .status(201)
        .field_eq("name", "Boris")
        .field_not_null("createdAt")
        .build()
        .unwrap();

        let value = serde_json::to_value(&scenario).unwrap();
        assert_eq!(value["expect"]["fields"][0]["path"], json!("name"));
        let back: Scenario = serde_json::from_value(value).unwrap();
        assert_eq!(back, scenario);
    }
}
