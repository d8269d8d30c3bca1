//! Authenticated API client.
//!
//! `ApiClient::fetch` wraps a single outbound request: it normalizes the
//! path, attaches the bearer token from the session store, defaults the
//! content type for bodies, and turns a 401 into a forced logout. Failures
//! never reach the caller as errors; they surface as a notice and `None`.

pub mod client;
pub mod error;
pub mod request;
pub mod transport;

pub use client::ApiClient;
pub use error::TransportError;
pub use request::{normalize_path, OutboundRequest, RequestOptions};
pub use transport::{ReqwestTransport, Transport};
