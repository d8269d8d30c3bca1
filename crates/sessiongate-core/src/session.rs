//! Session client: the host-facing bundle of gate, logout and API client.
//!
//! The host builds one `SessionClient` per page with its storage, navigation
//! and notice capabilities, then calls `init` once when the page has loaded.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use crate::api::{ApiClient, ReqwestTransport, Transport};
use crate::auth::{
    AuthGate, FileSessionStore, GateDecision, KeyringSessionStore, Logout, Navigator,
    PageClassifier, SessionStore,
};
use crate::config::{Config, StoreBackend};
use crate::notify::{Notifier, ToastNotifier};

/// What page initialization decided and what the host should wire up
pub struct PageBindings {
    pub decision: GateDecision,
    /// Present when the page has a logout control; bind it to the control's click
    pub logout: Option<Logout>,
}

pub struct SessionClient {
    config: Config,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    gate: AuthGate,
    logout: Logout,
}

impl SessionClient {
    pub fn new(
        config: Config,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let classifier: Arc<dyn PageClassifier> = Arc::new(config.login_pages.clone());
        Self::with_classifier(config, store, navigator, notifier, classifier)
    }

    /// Use a custom login page rule instead of the configured one
    pub fn with_classifier(
        config: Config,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        classifier: Arc<dyn PageClassifier>,
    ) -> Self {
        let gate = AuthGate::new(
            store.clone(),
            navigator.clone(),
            classifier,
            config.login_path.clone(),
            config.dashboard_path.clone(),
        );
        let logout = Logout::new(store.clone(), navigator.clone(), config.login_path.clone());
        Self {
            config,
            store,
            navigator,
            notifier,
            gate,
            logout,
        }
    }

    /// Run the auth check for the loaded page and collect UI bindings.
    ///
    /// `has_element` tells whether the page contains an element with the given id.
    pub fn init(&self, path: &str, has_element: impl Fn(&str) -> bool) -> PageBindings {
        let decision = self.gate.check(path);
        let logout = if has_element(&self.config.logout_element_id) {
            debug!(id = %self.config.logout_element_id, "Logout control bound");
            Some(self.logout.clone())
        } else {
            None
        };
        PageBindings { decision, logout }
    }

    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    pub fn logout(&self) {
        self.logout.run();
    }

    pub fn logout_action(&self) -> Logout {
        self.logout.clone()
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// API client over any transport, sharing this session's capabilities
    pub fn api<T: Transport>(&self, transport: T) -> ApiClient<T> {
        ApiClient::new(
            transport,
            self.store.clone(),
            self.notifier.clone(),
            self.logout.clone(),
        )
    }

    /// API client over HTTP to the configured base URL
    pub fn http_api(&self) -> Result<ApiClient<ReqwestTransport>> {
        let transport = ReqwestTransport::new(
            self.config.base_url.clone(),
            Duration::from_secs(self.config.request_timeout_secs),
        )
        .context("Failed to build HTTP client")?;
        Ok(self.api(transport))
    }
}

/// Open the token store selected in the configuration
pub fn open_store(config: &Config) -> Result<Arc<dyn SessionStore>> {
    let store: Arc<dyn SessionStore> = match config.store_backend {
        StoreBackend::File => {
            let dir = config.storage_dir()?;
            Arc::new(FileSessionStore::new(&dir, config.storage_key.clone()))
        }
        StoreBackend::Keyring => Arc::new(KeyringSessionStore::new(
            config.keyring_service(),
            config.storage_key.clone(),
        )),
    };
    Ok(store)
}

/// Toast notifier using the configured container id and delay
pub fn toast_notifier(config: &Config) -> ToastNotifier {
    ToastNotifier::new(
        config.toast_container_id.clone(),
        Duration::from_millis(config.toast_delay_ms),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemorySessionStore;
    use crate::notify::Severity;
    use crate::test_support::{RecordingNavigator, RecordingNotifier};

    fn client(token: Option<&str>) -> (SessionClient, Arc<MemorySessionStore>, Arc<RecordingNavigator>) {
        let store = Arc::new(match token {
            Some(t) => MemorySessionStore::with_token(t),
            None => MemorySessionStore::new(),
        });
        let navigator = Arc::new(RecordingNavigator::default());
        let client = SessionClient::new(
            Config::default(),
            store.clone(),
            navigator.clone(),
            Arc::new(RecordingNotifier::default()),
        );
        (client, store, navigator)
    }

    #[test]
    fn test_init_binds_logout_when_control_present() {
        let (client, store, navigator) = client(Some("tok"));

        let bindings = client.init("/inventory", |id| id == "logout-button");
        assert_eq!(bindings.decision, GateDecision::Stay);
        let logout = bindings.logout.expect("logout should be bound");

        // Clicking the control
        logout.run();
        assert_eq!(store.token(), None);
        assert_eq!(navigator.visited(), vec!["/login"]);
    }

    #[test]
    fn test_init_without_control() {
        let (client, _store, navigator) = client(None);

        let bindings = client.init("/sales", |_| false);
        assert_eq!(bindings.decision, GateDecision::RedirectToLogin);
        assert!(bindings.logout.is_none());
        assert_eq!(navigator.visited(), vec!["/login"]);
    }

    #[test]
    fn test_configured_targets() {
        let config = Config {
            login_path: "/signin".to_string(),
            dashboard_path: "/home".to_string(),
            ..Config::default()
        };
        let navigator = Arc::new(RecordingNavigator::default());
        let client = SessionClient::new(
            config,
            Arc::new(MemorySessionStore::with_token("t")),
            navigator.clone(),
            Arc::new(RecordingNotifier::default()),
        );

        assert_eq!(client.init("/login", |_| false).decision, GateDecision::RedirectToDashboard);
        client.logout();
        assert_eq!(navigator.visited(), vec!["/home", "/signin"]);
    }

    #[test]
    fn test_custom_classifier() {
        let navigator = Arc::new(RecordingNavigator::default());
        let client = SessionClient::with_classifier(
            Config::default(),
            Arc::new(MemorySessionStore::new()),
            navigator.clone(),
            Arc::new(RecordingNotifier::default()),
            Arc::new(|path: &str| path.starts_with("/public")),
        );

        assert_eq!(client.gate().check("/public/pricing"), GateDecision::Stay);
        assert_eq!(client.gate().check("/"), GateDecision::RedirectToLogin);
    }

    #[test]
    fn test_toast_notifier_from_config() {
        let config = Config {
            toast_container_id: "toasts".to_string(),
            ..Config::default()
        };
        let notifier = toast_notifier(&config);
        notifier.show("hi", Severity::Info);
        assert_eq!(notifier.container().map(|c| c.id).as_deref(), Some("toasts"));
    }
}
