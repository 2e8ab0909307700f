use std::{path::PathBuf, time::Duration};

use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
};

use crate::error::{ConfigError, Result};

/// Public marketplace site; the API lives under `/api/v1` on the same host.
pub const DEFAULT_MARKETPLACE_BASE_URL: &str = "https://marketplace.dify.ai";

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketwatchConfig {
    /// Plugins to watch, either `owner/name` or a full marketplace URL.
    pub plugin_urls: Vec<String>,

    /// Marketplace base URL (site and API share a host).
    pub marketplace_base_url: String,

    /// How far back an update still counts as recent.
    pub lookback_minutes: u64,

    /// Per-request timeout for marketplace and webhook calls.
    pub request_timeout_secs: u64,

    /// Where to export the collected version summary, if anywhere.
    pub summary_path: Option<PathBuf>,

    pub discord_webhook_url: Option<Secret<String>>,
    pub slack_webhook_url: Option<Secret<String>>,
}

impl Default for MarketwatchConfig {
    fn default() -> Self {
        Self {
            plugin_urls: Vec::new(),
            marketplace_base_url: DEFAULT_MARKETPLACE_BASE_URL.into(),
            lookback_minutes: 60,
            request_timeout_secs: 30,
            summary_path: None,
            discord_webhook_url: None,
            slack_webhook_url: None,
        }
    }
}

impl MarketwatchConfig {
    /// The configured plugin list, or [`ConfigError::MissingPlugins`] when empty.
    pub fn require_plugins(&self) -> Result<&[String]> {
        if self.plugin_urls.is_empty() {
            return Err(ConfigError::MissingPlugins);
        }
        Ok(&self.plugin_urls)
    }

    /// Discord webhook URL; `None` when unset or blank.
    pub fn discord_webhook(&self) -> Option<&str> {
        non_blank(self.discord_webhook_url.as_ref())
    }

    /// Slack webhook URL; `None` when unset or blank.
    pub fn slack_webhook(&self) -> Option<&str> {
        non_blank(self.slack_webhook_url.as_ref())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn non_blank(secret: Option<&Secret<String>>) -> Option<&str> {
    secret
        .map(|s| s.expose_secret().trim())
        .filter(|s| !s.is_empty())
}

/// Split a comma-separated plugin list, trimming entries and dropping empties.
pub fn parse_plugin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
