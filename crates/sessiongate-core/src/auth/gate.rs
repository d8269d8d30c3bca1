use std::sync::Arc;

use tracing::debug;

use super::{Navigator, PageClassifier, SessionStore};

/// Outcome of the page-load auth check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Stay,
    RedirectToLogin,
    RedirectToDashboard,
}

impl GateDecision {
    /// Decision table: redirect away from protected pages without a token,
    /// and away from login pages with one.
    pub fn decide(has_token: bool, is_login_page: bool) -> Self {
        match (has_token, is_login_page) {
            (false, false) => GateDecision::RedirectToLogin,
            (true, true) => GateDecision::RedirectToDashboard,
            _ => GateDecision::Stay,
        }
    }

    pub fn is_redirect(&self) -> bool {
        !matches!(self, GateDecision::Stay)
    }
}

/// Page-load redirect check
pub struct AuthGate {
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    classifier: Arc<dyn PageClassifier>,
    login_path: String,
    dashboard_path: String,
}

impl AuthGate {
    pub fn new(
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        classifier: Arc<dyn PageClassifier>,
        login_path: impl Into<String>,
        dashboard_path: impl Into<String>,
    ) -> Self {
        Self {
            store,
            navigator,
            classifier,
            login_path: login_path.into(),
            dashboard_path: dashboard_path.into(),
        }
    }

    /// Redirect target for a decision, if it navigates
    pub fn target(&self, decision: GateDecision) -> Option<&str> {
        match decision {
            GateDecision::Stay => None,
            GateDecision::RedirectToLogin => Some(&self.login_path),
            GateDecision::RedirectToDashboard => Some(&self.dashboard_path),
        }
    }

    /// Check the current page and navigate if the decision says so
    pub fn check(&self, path: &str) -> GateDecision {
        let has_token = self.store.token().is_some();
        let is_login_page = self.classifier.is_login_page(path);
        let decision = GateDecision::decide(has_token, is_login_page);
        debug!(path, has_token, is_login_page, ?decision, "Auth gate checked");

        if let Some(target) = self.target(decision) {
            self.navigator.navigate(target);
        }
        decision
    }
}
