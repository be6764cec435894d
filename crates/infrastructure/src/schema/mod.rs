//! JSON Schema loading and validation.

mod store;

pub use store::JsonSchemaStore;
