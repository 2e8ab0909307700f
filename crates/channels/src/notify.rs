use {
    chrono::Utc,
    futures::future::join_all,
    marketwatch_marketplace::PluginVersionInfo,
    tracing::info,
};

use crate::{
    dispatch::{DispatchOutcome, WebhookDispatcher},
    render::NotificationRenderer,
    schema::ChannelKind,
};

/// A channel and where to post it, if anywhere.
#[derive(Debug, Clone, Copy)]
pub struct ChannelTarget<'a> {
    pub kind: ChannelKind,
    pub destination: Option<&'a str>,
}

/// Per-channel outcomes of one notification round.
#[derive(Debug, Clone, Default)]
pub struct NotifyReport {
    outcomes: Vec<(ChannelKind, DispatchOutcome)>,
}

impl NotifyReport {
    pub fn outcome(&self, kind: ChannelKind) -> Option<&DispatchOutcome> {
        self.outcomes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, outcome)| outcome)
    }

    /// Whether `kind` was delivered. Channels not in the round count as not sent.
    pub fn sent(&self, kind: ChannelKind) -> bool {
        self.outcome(kind).is_some_and(DispatchOutcome::is_sent)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ChannelKind, DispatchOutcome)> {
        self.outcomes.iter()
    }
}

/// Render and send `updates` to every target.
///
/// Nothing is rendered or sent when `updates` is empty. Targets are posted
/// concurrently and independently; one failing does not affect the others.
pub async fn notify_all(
    dispatcher: &WebhookDispatcher,
    updates: &[PluginVersionInfo],
    targets: &[ChannelTarget<'_>],
) -> NotifyReport {
    if updates.is_empty() {
        info!("no recent updates, nothing to send");
        return NotifyReport {
            outcomes: targets
                .iter()
                .map(|t| (t.kind, DispatchOutcome::Skipped))
                .collect(),
        };
    }

    let rendered_at = Utc::now();
    let sends = targets.iter().map(|target| async move {
        let schema = target.kind.schema();
        let payload = schema.render(updates, rendered_at);
        let outcome = dispatcher
            .dispatch(schema, &payload, target.destination)
            .await;
        (target.kind, outcome)
    });

    NotifyReport {
        outcomes: join_all(sends).await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, mockito::Matcher};

    fn update(name: &str) -> PluginVersionInfo {
        PluginVersionInfo::new(
            name,
            format!("test/{name}"),
            "1.2.3",
            "2025-03-10T05:31:12Z",
            5,
            format!("https://marketplace.test/plugins/test/{name}"),
        )
    }

    #[tokio::test]
    async fn no_updates_means_no_requests() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let discord = format!("{}/discord", server.url());
        let slack = format!("{}/slack", server.url());
        let report = notify_all(&WebhookDispatcher::default(), &[], &[
            ChannelTarget {
                kind: ChannelKind::Discord,
                destination: Some(&discord),
            },
            ChannelTarget {
                kind: ChannelKind::Slack,
                destination: Some(&slack),
            },
        ])
        .await;

        assert_eq!(
            report.outcome(ChannelKind::Discord),
            Some(&DispatchOutcome::Skipped)
        );
        assert!(!report.sent(ChannelKind::Slack));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn one_channel_failing_does_not_block_the_other() {
        let mut server = mockito::Server::new_async().await;
        let discord_mock = server
            .mock("POST", "/discord")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;
        let slack_mock = server
            .mock("POST", "/slack")
            .match_body(Matcher::Regex("plugin-a".into()))
            .with_status(200)
            .create_async()
            .await;

        let discord = format!("{}/discord", server.url());
        let slack = format!("{}/slack", server.url());
        let report = notify_all(&WebhookDispatcher::default(), &[update("plugin-a")], &[
            ChannelTarget {
                kind: ChannelKind::Discord,
                destination: Some(&discord),
            },
            ChannelTarget {
                kind: ChannelKind::Slack,
                destination: Some(&slack),
            },
        ])
        .await;

        assert!(!report.sent(ChannelKind::Discord));
        assert!(report.sent(ChannelKind::Slack));
        assert_eq!(report.iter().count(), 2);
        discord_mock.assert_async().await;
        slack_mock.assert_async().await;
    }

    #[tokio::test]
    async fn unconfigured_channel_is_skipped() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/discord")
            .with_status(204)
            .expect(1)
            .create_async()
            .await;

        let discord = format!("{}/discord", server.url());
        let report = notify_all(&WebhookDispatcher::default(), &[update("a")], &[
            ChannelTarget {
                kind: ChannelKind::Discord,
                destination: Some(&discord),
            },
            ChannelTarget {
                kind: ChannelKind::Slack,
                destination: None,
            },
        ])
        .await;

        assert!(report.sent(ChannelKind::Discord));
        assert_eq!(
            report.outcome(ChannelKind::Slack),
            Some(&DispatchOutcome::Skipped)
        );
        mock.assert_async().await;
    }
}
