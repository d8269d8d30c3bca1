//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: the API
//! base URL, the storage key holding the session token, the two redirect
//! targets, login page rules and notice settings.
//!
//! Configuration is stored at `~/.config/sessiongate/config.json`.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::LoginPages;

/// Application name used for config/storage directory paths
const APP_NAME: &str = "sessiongate";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the API base URL
pub const ENV_BASE_URL: &str = "SESSIONGATE_BASE_URL";

/// Environment variable overriding the token store backend
pub const ENV_STORE: &str = "SESSIONGATE_STORE";

/// Where the session token is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// JSON key-value file in the storage directory
    #[default]
    File,
    /// OS keychain
    Keyring,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "keyring" => Ok(StoreBackend::Keyring),
            other => Err(anyhow::anyhow!("Unknown store backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    /// Key the session token is stored under
    pub storage_key: String,
    pub login_path: String,
    pub dashboard_path: String,
    pub login_pages: LoginPages,
    /// Id of the optional control wired to logout on page load
    pub logout_element_id: String,
    /// Id of the container hosting notices, created on first use
    pub toast_container_id: String,
    pub toast_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub store_backend: StoreBackend,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            storage_key: "access_token".to_string(),
            login_path: "/login".to_string(),
            dashboard_path: "/dashboard".to_string(),
            login_pages: LoginPages::default(),
            logout_element_id: "logout-button".to_string(),
            toast_container_id: "notification-toast".to_string(),
            toast_delay_ms: 4000,
            request_timeout_secs: 30,
            store_backend: StoreBackend::File,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_BASE_URL).ok(),
            std::env::var(ENV_STORE).ok(),
        );
    }

    fn apply_overrides(&mut self, base_url: Option<String>, store: Option<String>) {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(store) = store {
            match store.parse::<StoreBackend>() {
                Ok(backend) => self.store_backend = backend,
                Err(e) => warn!(error = %e, "Keeping configured store backend"),
            }
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the file token store and logs
    pub fn storage_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn keyring_service(&self) -> &'static str {
        APP_NAME
    }
}
