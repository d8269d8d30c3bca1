use tracing::info;

use sessiongate_core::Navigator;

/// Follows redirects by printing the destination URL
pub struct TerminalNavigator {
    base_url: String,
}

impl TerminalNavigator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, target: &str) -> String {
        format!("{}{}", self.base_url, target)
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, target: &str) {
        let url = self.url_for(target);
        info!(%url, "Navigating");
        println!("Redirecting to {}", url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_target() {
        let navigator = TerminalNavigator::new("http://localhost:8000/");
        assert_eq!(navigator.url_for("/login"), "http://localhost:8000/login");
    }
}
