//! Restcheck Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration and logging setup.

pub mod adapters;
pub mod config;
pub mod export;
pub mod logging;
pub mod observers;
pub mod schema;

pub use adapters::{ReqwestHttpClient, SystemClock};
pub use config::{ConfigError, HarnessConfig};
pub use export::{ExportError, HarExporter};
pub use logging::{DEFAULT_DIRECTIVE, init_tracing};
pub use observers::{ExchangeRecord, ExchangeRecorder, TracingObserver};
pub use schema::JsonSchemaStore;
