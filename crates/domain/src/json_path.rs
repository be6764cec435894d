//! JSON path expressions used by field assertions.
//!
//! The syntax is a dotted path with optional bracket indices:
//! `token`, `data.email`, `data[5].email`, `data.email[5]`, `data[*].id`.
//! A leading `$` or `$.` is accepted and ignored.
//!
//! A field segment applied to an array projects over its elements, so
//! `data.email` on a page of users yields the list of their emails.
//! Elements lacking the field contribute `null`, keeping the projection
//! aligned with the array; a field absent from every element is missing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// One step of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object member (or projection over an array of objects).
    Field(String),
    /// Array element.
    Index(usize),
    /// Every element of an array, or every value of an object.
    Wildcard,
}

/// A parsed JSON path expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JsonPath {
    raw: String,
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// Parses a path expression.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidJsonPath`] for empty segments,
    /// unbalanced brackets or non-numeric indices.
    pub fn parse(expr: &str) -> DomainResult<Self> {
        let raw = expr.trim().to_string();
        let body = raw.strip_prefix('$').unwrap_or(&raw);
        let body = body.strip_prefix('.').unwrap_or(body);

        let invalid = |reason: &str| DomainError::InvalidJsonPath {
            path: raw.clone(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        if body.is_empty() {
            return Ok(Self { raw, segments });
        }

        for part in split_segments(body).map_err(|reason| invalid(&reason))? {
            let (name, indices) = match part.find('[') {
                Some(start) => (&part[..start], &part[start..]),
                None => (part.as_str(), ""),
            };
            if name.is_empty() && indices.is_empty() {
                return Err(invalid("empty segment"));
            }
            if !name.is_empty() {
                segments.push(PathSegment::Field(name.to_string()));
            }
            for index in parse_indices(indices).map_err(|reason| invalid(&reason))? {
                segments.push(index);
            }
        }

        Ok(Self { raw, segments })
    }

    /// The expression as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed segments; empty for the document root.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Selects the value at this path, or `None` if any step is missing.
    #[must_use]
    pub fn select(&self, root: &Value) -> Option<Value> {
        let mut current = root.clone();
        for segment in &self.segments {
            current = step(current, segment)?;
        }
        Some(current)
    }
}

fn step(current: Value, segment: &PathSegment) -> Option<Value> {
    match (segment, current) {
        (PathSegment::Field(name), Value::Object(mut map)) => map.remove(name),
        (PathSegment::Field(name), Value::Array(items)) => {
            // Elements without the member project to null so positions hold.
            let mut found = items.is_empty();
            let projected: Vec<Value> = items
                .into_iter()
                .map(|item| match item {
                    Value::Object(mut map) => map.remove(name).inspect(|_| found = true),
                    _ => None,
                })
                .map(Option::unwrap_or_default)
                .collect();
            found.then_some(Value::Array(projected))
        }
        (PathSegment::Index(idx), Value::Array(mut items)) => {
            if *idx < items.len() {
                Some(items.swap_remove(*idx))
            } else {
                None
            }
        }
        (PathSegment::Wildcard, Value::Array(items)) => Some(Value::Array(items)),
        (PathSegment::Wildcard, Value::Object(map)) => {
            Some(Value::Array(map.into_iter().map(|(_, v)| v).collect()))
        }
        _ => None,
    }
}

/// Splits on dots that are not inside brackets.
fn split_segments(path: &str) -> Result<Vec<String>, String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_bracket = false;

    for ch in path.chars() {
        match ch {
            '.' if !in_bracket => {
                if current.is_empty() {
                    return Err("empty segment".to_string());
                }
                segments.push(std::mem::take(&mut current));
            }
            '[' if in_bracket => return Err("nested '['".to_string()),
            '[' => {
                in_bracket = true;
                current.push(ch);
            }
            ']' if !in_bracket => return Err("unmatched ']'".to_string()),
            ']' => {
                in_bracket = false;
                current.push(ch);
            }
            _ => current.push(ch),
        }
    }

    if in_bracket {
        return Err("unclosed '['".to_string());
    }
    if current.is_empty() {
        return Err("empty segment".to_string());
    }
    segments.push(current);
    Ok(segments)
}

/// Parses a run of bracket groups like `[0][*]`.
fn parse_indices(mut rest: &str) -> Result<Vec<PathSegment>, String> {
    let mut out = Vec::new();
    while !rest.is_empty() {
        let inner_end = rest
            .find(']')
            .ok_or_else(|| "unclosed '['".to_string())?;
        if !rest.starts_with('[') {
            return Err(format!("unexpected text '{rest}'"));
        }
        let inner = rest[1..inner_end].trim();
        if inner == "*" {
            out.push(PathSegment::Wildcard);
        } else {
            let idx = inner
                .parse::<usize>()
                .map_err(|_| format!("invalid array index '{inner}'"))?;
            out.push(PathSegment::Index(idx));
        }
        rest = &rest[inner_end + 1..];
    }
    Ok(out)
}

impl FromStr for JsonPath {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for JsonPath {
    type Error = DomainError;

    fn try_from(value: String) -> DomainResult<Self> {
        Self::parse(&value)
    }
}

impl From<JsonPath> for String {
    fn from(path: JsonPath) -> Self {
        path.raw
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
