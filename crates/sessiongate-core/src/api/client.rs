//! API client that attaches the session token to every request.
//!
//! This module provides the `ApiClient` struct, the single entry point the
//! application uses for server calls. Non-401 responses are returned as-is,
//! including error statuses, which callers inspect themselves.

use std::sync::Arc;

use reqwest::StatusCode;
use tracing::{debug, error, warn};

use super::{OutboundRequest, RequestOptions, Transport};
use crate::auth::{Logout, SessionStore};
use crate::notify::{Notifier, Severity};

/// Notice shown when the server rejects the token
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired.";

/// Notice shown when the request never produced a response
pub const NETWORK_ERROR_MESSAGE: &str = "Network error.";

pub struct ApiClient<T: Transport> {
    transport: T,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    logout: Logout,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(
        transport: T,
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
        logout: Logout,
    ) -> Self {
        Self {
            transport,
            store,
            notifier,
            logout,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request on behalf of the signed-in user.
    ///
    /// Returns `None` when the failure has already been handled: on 401 the
    /// user is logged out, on transport failure a notice is shown. Callers
    /// should stop processing in that case.
    pub async fn fetch(&self, path: &str, options: RequestOptions) -> Option<T::Response> {
        let token = self.store.token();
        let request = match OutboundRequest::prepare(path, options, token.as_deref()) {
            Ok(request) => request,
            Err(e) => {
                error!(error = %e, path, "API fetch error");
                self.notifier.show(NETWORK_ERROR_MESSAGE, Severity::Danger);
                return None;
            }
        };

        let method = request.method.clone();
        let path = request.path.clone();
        debug!(%method, %path, authenticated = token.is_some(), "API request");

        match self.transport.send(request).await {
            Ok(response) if self.transport.status(&response) == StatusCode::UNAUTHORIZED => {
                warn!(%method, %path, "Unauthorized response, logging out");
                self.notifier.show(SESSION_EXPIRED_MESSAGE, Severity::Danger);
                self.logout.run();
                None
            }
            Ok(response) => Some(response),
            Err(e) => {
                error!(error = %e, %method, %path, "API fetch error");
                self.notifier.show(NETWORK_ERROR_MESSAGE, Severity::Danger);
                None
            }
        }
    }
}
