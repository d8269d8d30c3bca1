//! Client-side session handling for a token-authenticated web application.
//!
//! - `auth`: token storage, page-load auth gate and logout
//! - `api`: request wrapper that attaches the bearer token and handles 401s
//! - `notify`: single-slot, auto-dismissing notices
//! - `session`: `SessionClient`, tying the pieces to one host
//!
//! Browser globals are modelled as injected capabilities (`SessionStore`,
//! `Navigator`, `Notifier`) so any host, or a test, can supply them.

pub mod api;
pub mod auth;
pub mod config;
pub mod notify;
pub mod session;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use api::{ApiClient, RequestOptions, ReqwestTransport, Transport, TransportError};
pub use auth::{GateDecision, Logout, Navigator, SessionStore};
pub use config::Config;
pub use notify::{Notice, Notifier, Severity, ToastNotifier};
pub use session::{PageBindings, SessionClient};
