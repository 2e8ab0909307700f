use std::time::Duration;

use {
    reqwest::Client,
    serde_json::Value,
    tracing::{debug, info, warn},
};

use crate::schema::ChannelSchema;

/// Result of posting one payload to one channel. Never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent,
    /// No destination configured.
    Skipped,
    Failed {
        /// `None` when the request never got a response.
        status: Option<u16>,
        detail: String,
    },
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// Posts rendered payloads to webhook URLs.
#[derive(Debug, Clone, Default)]
pub struct WebhookDispatcher {
    client: Client,
}

impl WebhookDispatcher {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self::with_client(Client::builder().timeout(timeout).build()?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// POST `payload` to `destination`.
    ///
    /// An absent or blank destination is [`DispatchOutcome::Skipped`] and makes
    /// no request. Only the channel's own success status counts as sent.
    pub async fn dispatch(
        &self,
        channel: &ChannelSchema,
        payload: &Value,
        destination: Option<&str>,
    ) -> DispatchOutcome {
        let Some(url) = destination.map(str::trim).filter(|u| !u.is_empty()) else {
            debug!(channel = %channel.kind, "no webhook configured, skipping");
            return DispatchOutcome::Skipped;
        };

        let response = match self.client.post(url).json(payload).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(channel = %channel.kind, error = %e, "webhook request failed");
                return DispatchOutcome::Failed {
                    status: None,
                    detail: e.to_string(),
                };
            },
        };

        let status = response.status().as_u16();
        if status == channel.success_status {
            info!(channel = %channel.kind, status, "notification sent");
            return DispatchOutcome::Sent;
        }

        let body = response.text().await.unwrap_or_default();
        warn!(
            channel = %channel.kind,
            status,
            expected = channel.success_status,
            body = %body,
            "webhook rejected notification"
        );
        DispatchOutcome::Failed {
            status: Some(status),
            detail: body,
        }
    }
}
