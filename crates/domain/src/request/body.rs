//! HTTP Request body types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Content type sent with every JSON body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Request body of a scenario.
///
/// Scenario bodies are flat JSON objects of string or number fields, the
/// shape the remote API accepts for register, login and create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "fields", rename_all = "snake_case")]
pub enum RequestBody {
    /// No body
    #[default]
    None,
    /// JSON object body
    Json(Map<String, Value>),
}

impl RequestBody {
    /// Creates an empty body.
    #[must_use]
    pub const fn none() -> Self {
        Self::None
    }

    /// Creates a JSON object body from key/value pairs.
    #[must_use]
    pub fn json<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Json(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns whether there is no body to send.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the content type if a body is present.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Json(_) => Some(JSON_CONTENT_TYPE),
        }
    }

    /// Serializes the body to its wire form.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Json(fields) => Some(Value::Object(fields.clone()).to_string()),
        }
    }
}
