//! HTTP Request domain types

mod body;
mod header;
mod method;
mod query;
mod spec;

pub use body::{JSON_CONTENT_TYPE, RequestBody};
pub use header::{Header, Headers, REDACTED, SENSITIVE_HEADERS};
pub use method::HttpMethod;
pub use query::{QueryParam, QueryParams};
pub use spec::{PreparedRequest, RequestSpec};
