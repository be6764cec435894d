//! Schemas shipped with the suite.

use restcheck_application::SchemaError;
use restcheck_infrastructure::JsonSchemaStore;

use crate::suite::{DELAYED_RESPONSE_SCHEMA, USERS_LIST_SCHEMA};

const BUNDLED: [(&str, &str); 2] = [
    (USERS_LIST_SCHEMA, include_str!("../schemas/users_list_schema.json")),
    (
        DELAYED_RESPONSE_SCHEMA,
        include_str!("../schemas/delayed_response_schema.json"),
    ),
];

/// Builds the store the suite validates against.
///
/// With a directory, schemas are read from it; without one, the bundled
/// copies are registered in memory. Every schema the suite references is
/// compiled up front so a broken document stops the run before any request.
///
/// # Errors
///
/// Returns the first schema that cannot be loaded or compiled.
pub fn schema_store(dir: Option<&std::path::Path>) -> Result<JsonSchemaStore, SchemaError> {
    let store = match dir {
        Some(dir) => JsonSchemaStore::with_dir(dir),
        None => BUNDLED
            .iter()
            .try_fold(JsonSchemaStore::in_memory(), |store, (name, text)| {
                store.with_document_str(name, text)
            })?,
    };

    for (name, _) in BUNDLED {
        store.preload(name)?;
    }
    Ok(store)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use restcheck_application::SchemaValidator;
    use restcheck_domain::SchemaRef;
    use serde_json::json;

    #[test]
    fn test_bundled_schemas_compile() {
        assert!(schema_store(None).is_ok());
    }

    #[test]
    fn test_users_list_schema_rejects_bad_user() {
        let store = schema_store(None).unwrap();
        let page = json!({
            "page": 2,
            "per_page": 6,
            "total": 12,
            "total_pages": 2,
            "data": [{"id": "7", "email": "michael.lawson@reqres.in"}],
            "support": {"url": "https://reqres.in", "text": "support"}
        });

        let violations = store
            .violations(&SchemaRef::new(USERS_LIST_SCHEMA), &page)
            .unwrap();
        assert!(violations.iter().any(|v| v.starts_with("/data/0/id: ")));
        assert!(violations.iter().any(|v| v.starts_with("/data/0: ")));
    }

    #[test]
    fn test_directory_must_hold_every_schema() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(USERS_LIST_SCHEMA),
            include_str!("../schemas/users_list_schema.json"),
        )
        .unwrap();

        assert_eq!(
            schema_store(Some(dir.path())).err(),
            Some(SchemaError::NotFound(DELAYED_RESPONSE_SCHEMA.to_string()))
        );
    }
}
