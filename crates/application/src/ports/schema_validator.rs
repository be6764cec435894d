//! Schema validation port

use restcheck_domain::SchemaRef;
use serde_json::Value;
use thiserror::Error;

/// Errors that prevent a schema from being used at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// No document with this name exists.
    #[error("schema not found: {0}")]
    NotFound(String),

    /// The document could not be read.
    #[error("failed to read schema '{name}': {message}")]
    Io {
        /// Schema name.
        name: String,
        /// I/O error message.
        message: String,
    },

    /// The document is not valid JSON.
    #[error("schema '{name}' is not valid JSON: {message}")]
    Parse {
        /// Schema name.
        name: String,
        /// Parser message.
        message: String,
    },

    /// The document is not a valid JSON Schema.
    #[error("schema '{name}' does not compile: {message}")]
    Compile {
        /// Schema name.
        name: String,
        /// Compiler message.
        message: String,
    },
}

/// Port for validating a JSON document against a named schema.
pub trait SchemaValidator: Send + Sync {
    /// Returns the violated constraints; an empty list means the instance
    /// is valid. Each entry reads `instance path: message`.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the schema itself is unusable.
    fn violations(&self, schema: &SchemaRef, instance: &Value) -> Result<Vec<String>, SchemaError>;
}
