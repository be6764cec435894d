//! Restcheck Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (HTTP transport, schema validation, exchange observers, clock)
//! - The scenario and suite use cases (BUILD, SEND, ASSERT)
//! - Application-level error handling

pub mod error;
pub mod ports;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{
    Clock, ExchangeContext, ExchangeObserver, HttpClient, HttpClientError, SchemaError,
    SchemaValidator,
};
pub use use_cases::{RunScenario, RunSuite};
