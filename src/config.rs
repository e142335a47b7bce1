//! Application Configuration
//!
//! `config.json` in the data directory, overridden by CLI flags and
//! environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use habit_core::api::{ServiceOptions, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config.json";
pub const DB_FILE: &str = "habit_tracker.db";
pub const LOG_APP_NAME: &str = "HabitTracker";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub use_mock: bool,
    /// Serve mock data when the service cannot be reached
    pub offline_fallback: bool,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            use_mock: false,
            offline_fallback: true,
            request_timeout_secs: 15,
        }
    }
}

impl AppConfig {
    /// Read `config.json` from `data_dir`; a missing file yields defaults.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, api_url: Option<String>, mock: bool) -> Self {
        if let Some(url) = api_url {
            self.api_base_url = url;
        }
        if mock {
            self.use_mock = true;
        }
        self
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            base_url: self.api_base_url.clone(),
            use_mock: self.use_mock,
            offline_fallback: self.offline_fallback,
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        }
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("habit-tracker")
}

pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}
