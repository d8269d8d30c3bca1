use std::sync::Arc;

use tracing::{info, warn};

use super::SessionStore;

/// Performs a full page transition to a path.
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &str);
}

/// Logout action: forget the token, then go to the login page.
///
/// Clone is cheap, so hosts can bind copies to as many controls as they like.
#[derive(Clone)]
pub struct Logout {
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl Logout {
    pub fn new(
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            store,
            navigator,
            login_path: login_path.into(),
        }
    }

    /// Clear the token and navigate to the login page.
    /// Navigation happens even if the store could not be cleared.
    pub fn run(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear session token");
        }
        info!(destination = %self.login_path, "Logged out");
        self.navigator.navigate(&self.login_path);
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }
}
