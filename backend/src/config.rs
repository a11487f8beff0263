//! Client configuration.
//!
//! Defaults work against a backend on localhost. A YAML file can override any
//! field, and `SPLITTER_API_BASE_URL` / `SPLITTER_JOIN_BASE_URL` override the
//! URLs on top of that.
//!
//! ```yaml
//! api_base_url: "https://split.example/api"
//! join_base_url: "https://split.example/join"
//! currency_symbol: "€"
//! guest_poll_interval_ms: 3000
//! ```

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const API_BASE_URL_ENV: &str = "SPLITTER_API_BASE_URL";
pub const JOIN_BASE_URL_ENV: &str = "SPLITTER_JOIN_BASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Base URL of the REST API, without trailing slash
    pub api_base_url: String,
    /// Base URL guests open to join a session
    pub join_base_url: String,
    pub currency_symbol: String,
    pub guest_poll_interval_ms: u64,
    pub receipt_poll_interval_ms: u64,
    pub receipt_max_polls: u32,
    pub request_timeout_ms: u64,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            join_base_url: "http://localhost:8080/join".to_string(),
            currency_symbol: "$".to_string(),
            guest_poll_interval_ms: 2000,
            receipt_poll_interval_ms: 1000,
            receipt_max_polls: 30,
            request_timeout_ms: 10_000,
        }
    }
}

impl SplitterConfig {
    /// Defaults, then the YAML file if given, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                Self::from_yaml_str(&contents)
                    .with_context(|| format!("Invalid config file {}", path.display()))?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Replace URLs with values from `lookup` (normally the environment)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            debug!("{} overrides api_base_url", API_BASE_URL_ENV);
            self.api_base_url = url;
        }
        if let Some(url) = lookup(JOIN_BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            debug!("{} overrides join_base_url", JOIN_BASE_URL_ENV);
            self.join_base_url = url;
        }
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();
    }

    pub fn guest_poll_interval(&self) -> Duration {
        Duration::from_millis(self.guest_poll_interval_ms)
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
