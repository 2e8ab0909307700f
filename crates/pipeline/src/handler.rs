use {
    anyhow::{Context, Result},
    chrono::{DateTime, TimeDelta, Utc},
    marketwatch_channels::{ChannelKind, ChannelTarget, NotifyReport, WebhookDispatcher, notify_all},
    marketwatch_config::MarketwatchConfig,
    marketwatch_marketplace::{
        MarketplaceClient, PluginSource, PluginVersionInfo, collect_all, filter_recent,
        summary::write_summary, timestamp::format_utc,
    },
    tracing::{Instrument, error, info, info_span, warn},
};

use crate::{
    event::TriggerEvent,
    response::{InvocationResponse, SuccessBody},
};

const TEST_PLUGIN_ID: &str = "test/plugin";

/// Build a pipeline from `config` and run one invocation.
///
/// Always returns an envelope; construction failures become a `500`.
pub async fn handle(event: TriggerEvent, config: MarketwatchConfig) -> InvocationResponse {
    match Pipeline::from_config(config) {
        Ok(pipeline) => pipeline.invoke(event).await,
        Err(e) => {
            error!(error = %format!("{e:#}"), "failed to set up pipeline");
            InvocationResponse::failure(format!("{e:#}"))
        },
    }
}

/// The watcher's collaborators for one or more invocations.
pub struct Pipeline<S> {
    source: S,
    dispatcher: WebhookDispatcher,
    config: MarketwatchConfig,
}

impl Pipeline<MarketplaceClient> {
    pub fn from_config(config: MarketwatchConfig) -> Result<Self> {
        let timeout = config.request_timeout();
        let source = MarketplaceClient::new(&config.marketplace_base_url, timeout)
            .context("failed to build marketplace client")?;
        let dispatcher =
            WebhookDispatcher::new(timeout).context("failed to build webhook client")?;
        Ok(Self::new(source, dispatcher, config))
    }
}

impl<S: PluginSource> Pipeline<S> {
    pub fn new(source: S, dispatcher: WebhookDispatcher, config: MarketwatchConfig) -> Self {
        Self {
            source,
            dispatcher,
            config,
        }
    }

    pub async fn invoke(&self, event: TriggerEvent) -> InvocationResponse {
        self.invoke_at(event, Utc::now()).await
    }

    /// Run one invocation with `now` as the single reference instant.
    pub async fn invoke_at(&self, event: TriggerEvent, now: DateTime<Utc>) -> InvocationResponse {
        let span = info_span!(
            "invocation",
            test_slack = event.test_slack,
            test_discord = event.test_discord
        );
        let result = async {
            if event.is_test() {
                self.run_test(event, now).await
            } else {
                self.run(now).await
            }
        }
        .instrument(span)
        .await;

        match result {
            Ok(body) => InvocationResponse::success(body),
            Err(e) => {
                error!(error = %format!("{e:#}"), "invocation failed");
                InvocationResponse::failure(format!("{e:#}"))
            },
        }
    }

    async fn run(&self, now: DateTime<Utc>) -> Result<SuccessBody> {
        let identifiers = self.config.require_plugins()?;
        let window = lookback_window(self.config.lookback_minutes)?;

        let collected = collect_all(&self.source, identifiers).await;
        if let Some(path) = &self.config.summary_path
            && let Err(e) = write_summary(path, &collected)
        {
            warn!(path = %path.display(), error = %e, "failed to write version summary");
        }

        let recent = filter_recent(&collected, now, window);
        info!(
            collected = collected.len(),
            recent = recent.len(),
            lookback_minutes = self.config.lookback_minutes,
            "filtered recent updates"
        );

        let targets = [
            ChannelTarget {
                kind: ChannelKind::Discord,
                destination: self.config.discord_webhook(),
            },
            ChannelTarget {
                kind: ChannelKind::Slack,
                destination: self.config.slack_webhook(),
            },
        ];
        let report = notify_all(&self.dispatcher, &recent, &targets).await;

        let message = if recent.is_empty() {
            "No recently updated plugins".to_string()
        } else {
            format!("Found {} recently updated plugin(s)", recent.len())
        };
        Ok(body(message, recent, &report, TriggerEvent::default()))
    }

    /// Send the synthetic record to the flagged channels only.
    async fn run_test(&self, event: TriggerEvent, now: DateTime<Utc>) -> Result<SuccessBody> {
        info!("sending test notification");
        let record = PluginVersionInfo::new(
            "test plugin",
            TEST_PLUGIN_ID,
            "1.0.0",
            format_utc(now),
            123,
            self.source.plugin_url(TEST_PLUGIN_ID),
        );

        let mut targets = Vec::with_capacity(2);
        if event.test_discord {
            targets.push(ChannelTarget {
                kind: ChannelKind::Discord,
                destination: self.config.discord_webhook(),
            });
        }
        if event.test_slack {
            targets.push(ChannelTarget {
                kind: ChannelKind::Slack,
                destination: self.config.slack_webhook(),
            });
        }

        let records = vec![record];
        let report = notify_all(&self.dispatcher, &records, &targets).await;
        Ok(body("Sent test notification".into(), records, &report, event))
    }
}

fn lookback_window(minutes: u64) -> Result<TimeDelta> {
    i64::try_from(minutes)
        .ok()
        .and_then(TimeDelta::try_minutes)
        .with_context(|| format!("lookback window of {minutes} minutes is out of range"))
}

fn body(
    message: String,
    plugin_data: Vec<PluginVersionInfo>,
    report: &NotifyReport,
    event: TriggerEvent,
) -> SuccessBody {
    for (kind, outcome) in report.iter() {
        info!(channel = %kind, outcome = ?outcome, "channel outcome");
    }
    SuccessBody {
        message,
        plugin_data,
        discord_sent: report.sent(ChannelKind::Discord),
        slack_sent: report.sent(ChannelKind::Slack),
        test_discord: event.test_discord,
        test_slack: event.test_slack,
    }
}
