//! Exchange observers: logging and report capture.

mod recorder;
mod tracing_observer;

pub use recorder::{ExchangeRecord, ExchangeRecorder};
pub use tracing_observer::TracingObserver;
