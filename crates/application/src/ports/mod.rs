//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the harness core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod clock;
mod http_client;
mod observer;
mod schema_validator;

pub use clock::Clock;
pub use http_client::{HttpClient, HttpClientError};
pub use observer::{ExchangeContext, ExchangeObserver};
pub use schema_validator::{SchemaError, SchemaValidator};
