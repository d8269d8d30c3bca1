//! User-facing notices.
//!
//! A `Notifier` shows one transient, dismissible message at a time.
//! `ToastNotifier` is the standard implementation: a single lazily created
//! container whose notice is replaced on every call and auto-dismissed
//! after a fixed delay.

pub mod toast;

pub use toast::{Notice, Severity, ToastContainer, ToastNotifier};

/// Shows a message to the user.
pub trait Notifier: Send + Sync {
    fn show(&self, message: &str, severity: Severity);
}
