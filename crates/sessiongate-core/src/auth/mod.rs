//! Authentication module for the persisted session token.
//!
//! This module provides:
//! - `SessionStore`: Token storage capability (memory, JSON file, OS keychain)
//! - `AuthGate`: Page-load redirect decision based on token presence
//! - `Logout`: Clears the token and navigates to the login page
//!
//! The token is opaque. Its absence is the only "logged out" signal;
//! expiry is discovered when the server rejects a request.

pub mod gate;
pub mod logout;
pub mod pages;
pub mod store;

pub use gate::{AuthGate, GateDecision};
pub use logout::{Logout, Navigator};
pub use pages::{LoginPages, PageClassifier};
pub use store::{FileSessionStore, KeyringSessionStore, MemorySessionStore, SessionStore, StoreError};
