use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Notifier;
use crate::utils::escape_html;

/// Default time a notice stays visible
pub const DEFAULT_DISMISS_DELAY_MS: u64 = 4000;

/// Default id of the notice container
pub const DEFAULT_CONTAINER_ID: &str = "notification-toast";

/// Classes applied to a freshly created container
const CONTAINER_CLASS: &str = "toast-container position-fixed bottom-0 end-0 p-3";

#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Success,
    Danger,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Danger => "danger",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    /// Background class for the notice body
    pub fn css_class(&self) -> String {
        format!("bg-{}", self.as_str())
    }
}

#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub shown_at: DateTime<Utc>,
}

impl Notice {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            shown_at: Utc::now(),
        }
    }

    /// Toast markup with a close button. The message is escaped.
    pub fn to_html(&self) -> String {
        format!(
            concat!(
                r#"<div id="liveToast" class="toast align-items-center text-white {} border-0" "#,
                r#"role="alert" aria-live="assertive" aria-atomic="true">"#,
                r#"<div class="d-flex"><div class="toast-body">{}</div>"#,
                r#"<button type="button" class="btn-close btn-close-white me-2 m-auto" "#,
                r#"data-bs-dismiss="toast" aria-label="Close"></button></div></div>"#
            ),
            self.severity.css_class(),
            escape_html(&self.message)
        )
    }
}

/// Host element for the single visible notice
#[derive(Debug, Clone, PartialEq)]
pub struct ToastContainer {
    pub id: String,
    pub class: String,
    pub notice: Option<Notice>,
}

#[derive(Debug, Default)]
struct ToastState {
    container: Option<ToastContainer>,
    // Bumped on every show/dismiss so stale timers leave newer notices alone
    generation: u64,
}

/// Single-slot notifier with auto-dismiss.
///
/// Clone is cheap and clones share the same container.
#[derive(Clone)]
pub struct ToastNotifier {
    state: Arc<Mutex<ToastState>>,
    container_id: String,
    delay: Duration,
}

impl Default for ToastNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER_ID, Duration::from_millis(DEFAULT_DISMISS_DELAY_MS))
    }
}

impl ToastNotifier {
    pub fn new(container_id: impl Into<String>, delay: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(ToastState::default())),
            container_id: container_id.into(),
            delay,
        }
    }

    /// Currently visible notice
    pub fn current(&self) -> Option<Notice> {
        let state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.container.as_ref().and_then(|c| c.notice.clone())
    }

    /// Snapshot of the container, if one has been created yet
    pub fn container(&self) -> Option<ToastContainer> {
        let state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.container.clone()
    }

    /// Close the visible notice (the close button)
    pub fn dismiss(&self) {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.generation += 1;
        if let Some(container) = state.container.as_mut() {
            container.notice = None;
        }
    }

    /// Markup of the visible notice
    pub fn render_html(&self) -> Option<String> {
        self.current().map(|n| n.to_html())
    }

    fn dismiss_if_current(&self, generation: u64) {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        if state.generation != generation {
            return;
        }
        if let Some(container) = state.container.as_mut() {
            if container.notice.take().is_some() {
                debug!("Notice auto-dismissed");
            }
        }
    }

    fn schedule_dismiss(&self, generation: u64) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No async runtime, notice will stay until dismissed");
            return;
        };
        let notifier = self.clone();
        let delay = self.delay;
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            notifier.dismiss_if_current(generation);
        });
    }
}

impl Notifier for ToastNotifier {
    fn show(&self, message: &str, severity: Severity) {
        let generation = {
            let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
            let container_id = &self.container_id;
            let container = state.container.get_or_insert_with(|| {
                debug!(id = %container_id, "Creating notice container");
                ToastContainer {
                    id: container_id.clone(),
                    class: CONTAINER_CLASS.to_string(),
                    notice: None,
                }
            });
            container.notice = Some(Notice::new(message, severity));
            state.generation += 1;
            state.generation
        };
        debug!(severity = severity.as_str(), text = message, "Notice shown");
        self.schedule_dismiss(generation);
    }
}
