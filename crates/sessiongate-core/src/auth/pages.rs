use serde::{Deserialize, Serialize};

/// Decides whether a page path is a login-like page.
pub trait PageClassifier: Send + Sync {
    fn is_login_page(&self, path: &str) -> bool;
}

impl<F> PageClassifier for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_login_page(&self, path: &str) -> bool {
        self(path)
    }
}

/// Rule set for login-like pages.
///
/// A path matches if it equals one of `exact`, or if any of its
/// `/`-separated segments equals one of `segments`. Query and fragment
/// are ignored, so `/login?next=/x` matches but `/account/login-history`
/// does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginPages {
    pub exact: Vec<String>,
    pub segments: Vec<String>,
}

impl Default for LoginPages {
    fn default() -> Self {
        Self {
            exact: vec!["/".to_string()],
            segments: vec!["login".to_string()],
        }
    }
}

impl LoginPages {
    fn strip_query(path: &str) -> &str {
        let end = path.find(['?', '#']).unwrap_or(path.len());
        &path[..end]
    }
}

impl PageClassifier for LoginPages {
    fn is_login_page(&self, path: &str) -> bool {
        let path = Self::strip_query(path);
        if self.exact.iter().any(|p| p == path) {
            return true;
        }
        path.split('/')
            .filter(|s| !s.is_empty())
            .any(|segment| self.segments.iter().any(|s| s == segment))
    }
}
