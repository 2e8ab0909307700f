//! HTTP client for the marketplace's public plugin API.

use std::time::Duration;

use {
    async_trait::async_trait,
    reqwest::{Client, StatusCode, header::USER_AGENT},
    tracing::debug,
};

use crate::error::FetchError;

/// Path segment that precedes `owner/name` in marketplace site URLs.
const PLUGIN_PATH_MARKER: &str = "/plugins/";

const CLIENT_USER_AGENT: &str = concat!(
    "marketwatch/",
    env!("CARGO_PKG_VERSION"),
    " (plugin update notifier)"
);

/// Source of raw plugin documents.
#[async_trait]
pub trait PluginSource: Send + Sync {
    /// Fetch the raw API document for `identifier`.
    async fn fetch(&self, identifier: &str) -> Result<serde_json::Value, FetchError>;

    /// Public marketplace page for `identifier`.
    fn plugin_url(&self, identifier: &str) -> String;
}

/// `owner/name` part of an identifier.
///
/// Full URLs are cut after the first `/plugins/`; anything else is used as-is.
pub fn plugin_path(identifier: &str) -> &str {
    let trimmed = identifier.trim();
    let path = trimmed
        .split_once(PLUGIN_PATH_MARKER)
        .map_or(trimmed, |(_, rest)| rest);
    path.trim_end_matches('/')
}

#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    client: Client,
    base_url: String,
}

impl MarketplaceClient {
    /// Build a client against `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Network)?;
        Ok(Self::with_client(client, base_url))
    }

    /// Use an existing `reqwest` client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, identifier: &str) -> String {
        format!("{}/api/v1/plugins/{}", self.base_url, plugin_path(identifier))
    }
}

#[async_trait]
impl PluginSource for MarketplaceClient {
    async fn fetch(&self, identifier: &str) -> Result<serde_json::Value, FetchError> {
        let url = self.api_url(identifier);
        debug!(url = %url, "fetching plugin metadata");

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await
            .map_err(FetchError::Network)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(FetchError::Network)?;
        Ok(serde_json::from_str(&body)?)
    }

    fn plugin_url(&self, identifier: &str) -> String {
        format!("{}/plugins/{}", self.base_url, plugin_path(identifier))
    }
}
