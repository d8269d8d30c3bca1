//! Recording fakes for the host capabilities.

use std::sync::Mutex;

use crate::auth::Navigator;
use crate::notify::{Notifier, Severity};

#[derive(Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: &str) {
        self.visited.lock().unwrap().push(target.to_string());
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<(String, Severity)>>,
}

impl RecordingNotifier {
    pub fn shown(&self) -> Vec<(String, Severity)> {
        self.shown.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, message: &str, severity: Severity) {
        self.shown.lock().unwrap().push((message.to_string(), severity));
    }
}
