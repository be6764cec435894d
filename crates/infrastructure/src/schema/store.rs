//! Schema store backed by the `jsonschema` crate.
//!
//! Schemas are looked up by name: first among documents registered in
//! memory, then as a file under the schema directory. Each schema is
//! compiled once and cached for the rest of the run.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use jsonschema::JSONSchema;
use parking_lot::RwLock;
use restcheck_application::ports::{SchemaError, SchemaValidator};
use restcheck_domain::SchemaRef;
use serde_json::Value;

/// Named JSON Schema documents, compiled on first use.
pub struct JsonSchemaStore {
    root: Option<PathBuf>,
    documents: HashMap<String, Value>,
    compiled: RwLock<HashMap<String, Arc<JSONSchema>>>,
}

impl JsonSchemaStore {
    /// Creates a store with no directory; only registered documents resolve.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            root: None,
            documents: HashMap::new(),
            compiled: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a store that reads `<dir>/<name>` for unknown names.
    #[must_use]
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(dir.into()),
            ..Self::in_memory()
        }
    }

    /// Registers a document under `name`; it takes precedence over files.
    #[must_use]
    pub fn with_document(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.documents.insert(name.into(), schema);
        self
    }

    /// Registers a document given as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Parse`] if `text` is not JSON.
    pub fn with_document_str(self, name: &str, text: &str) -> Result<Self, SchemaError> {
        let schema = serde_json::from_str(text).map_err(|e| SchemaError::Parse {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        Ok(self.with_document(name, schema))
    }

    /// Compiles the named schema now instead of on first use.
    ///
    /// # Errors
    ///
    /// Returns the same errors validation would report for this schema.
    pub fn preload(&self, name: &str) -> Result<(), SchemaError> {
        self.compiled_schema(name).map(|_| ())
    }

    fn compiled_schema(&self, name: &str) -> Result<Arc<JSONSchema>, SchemaError> {
        if let Some(schema) = self.compiled.read().get(name) {
            return Ok(Arc::clone(schema));
        }

        let document = self.document(name)?;
        let compiled = JSONSchema::compile(&document).map_err(|e| SchemaError::Compile {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        let compiled = Arc::new(compiled);

        tracing::debug!(schema = name, "compiled JSON schema");
        self.compiled
            .write()
            .insert(name.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    fn document(&self, name: &str) -> Result<Value, SchemaError> {
        if let Some(document) = self.documents.get(name) {
            return Ok(document.clone());
        }

        let path = self
            .resolve(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;
        let text = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SchemaError::NotFound(name.to_string()),
            _ => SchemaError::Io {
                name: name.to_string(),
                message: e.to_string(),
            },
        })?;
        serde_json::from_str(&text).map_err(|e| SchemaError::Parse {
            name: name.to_string(),
            message: e.to_string(),
        })
    }

    /// Maps a name to a file under the root; names escaping it resolve to nothing.
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let root = self.root.as_ref()?;
        let relative = Path::new(name);
        let stays_inside = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        stays_inside.then(|| root.join(relative))
    }
}

impl SchemaValidator for JsonSchemaStore {
    fn violations(&self, schema: &SchemaRef, instance: &Value) -> Result<Vec<String>, SchemaError> {
        let compiled = self.compiled_schema(schema.name())?;
        let violations = match compiled.validate(instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    let path = if path.is_empty() { "/".to_string() } else { path };
                    format!("{path}: {e}")
                })
                .collect(),
        };
        Ok(violations)
    }
}
