use {
    chrono::{DateTime, Utc},
    marketwatch_marketplace::{PluginVersionInfo, timestamp::to_local_display},
    serde_json::{Map, Value, json},
    tracing::warn,
};

use crate::schema::{ChannelSchema, FooterStyle};

const UPDATED_INDICATOR: &str = "新しいバージョンがリリースされました";
const VERSION_LABEL: &str = "最新バージョン";
const UPDATED_AT_LABEL: &str = "更新日時";
const INSTALLS_LABEL: &str = "インストール数";
const FOOTER_PREFIX: &str = "Dify Marketplace Watcher";
const NAME_SEPARATOR: &str = "、";

/// Turns a non-empty set of recent updates into a channel payload.
pub trait NotificationRenderer {
    fn render(&self, updates: &[PluginVersionInfo], rendered_at: DateTime<Utc>) -> Value;
}

impl NotificationRenderer for ChannelSchema {
    fn render(&self, updates: &[PluginVersionInfo], rendered_at: DateTime<Utc>) -> Value {
        if self.exceeds_block_limit(updates.len()) {
            warn!(
                channel = %self.kind,
                blocks = updates.len(),
                max_blocks = ?self.max_blocks,
                "payload exceeds the channel's block limit and will likely be rejected"
            );
        }
        let footer = format!("{FOOTER_PREFIX} • {}", to_local_display(rendered_at));
        let blocks: Vec<Value> = updates
            .iter()
            .map(|info| self.block(info, &footer))
            .collect();

        let mut payload = Map::new();
        payload.insert(self.headline_key.into(), Value::from(headline(updates)));
        payload.insert(self.blocks_key.into(), Value::Array(blocks));
        Value::Object(payload)
    }
}

impl ChannelSchema {
    fn block(&self, info: &PluginVersionInfo, footer: &str) -> Value {
        let fields = [
            (VERSION_LABEL, info.latest_version.clone()),
            (UPDATED_AT_LABEL, info.updated_at_local.clone()),
            (INSTALLS_LABEL, group_thousands(info.install_count)),
        ]
        .into_iter()
        .map(|(label, value)| {
            json!({
                self.field_label_key: label,
                "value": value,
                self.field_inline_key: true,
            })
        })
        .collect::<Vec<_>>();

        let footer = match self.footer {
            FooterStyle::Object => json!({ "text": footer }),
            FooterStyle::Text => Value::from(footer),
        };

        json!({
            "title": format!("{} ({})", info.name, info.plugin_id),
            self.link_key: info.url,
            self.body_key: UPDATED_INDICATOR,
            "color": self.color.to_value(),
            "fields": fields,
            "footer": footer,
        })
    }
}

/// One-line summary: names the plugin when there is one, lists all names
/// with the count otherwise.
pub fn headline(updates: &[PluginVersionInfo]) -> String {
    match updates {
        [single] => format!("プラグイン「{}」がアップデートされました！", single.name),
        _ => {
            let names = updates
                .iter()
                .map(|u| format!("「{}」", u.name))
                .collect::<Vec<_>>()
                .join(NAME_SEPARATOR);
            format!(
                "{}個のプラグインがアップデートされました：{names}",
                updates.len()
            )
        },
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {
        super::*,
        crate::schema::{DISCORD, SLACK},
        chrono::TimeZone,
        rstest::rstest,
    };

    fn info(name: &str) -> PluginVersionInfo {
        PluginVersionInfo::new(
            name,
            format!("langgenius/{}", name.to_lowercase()),
            "0.2.1",
            "2025-03-10T05:31:12.123456Z",
            12345,
            format!("https://marketplace.dify.ai/plugins/langgenius/{}", name.to_lowercase()),
        )
    }

    fn rendered_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 6, 0, 0).unwrap()
    }

    #[test]
    fn singular_headline_names_plugin() {
        assert_eq!(
            headline(&[info("OpenAI")]),
            "プラグイン「OpenAI」がアップデートされました！"
        );
    }

    #[test]
    fn plural_headline_lists_names_and_count() {
        let text = headline(&[info("OpenAI"), info("Anthropic"), info("Gemini")]);
        assert!(text.starts_with("3個の"));
        assert!(text.contains("「OpenAI」、「Anthropic」、「Gemini」"));
    }

    #[test]
    fn discord_payload_shape() {
        let payload = DISCORD.render(&[info("OpenAI")], rendered_at());
        assert_eq!(payload["content"], "プラグイン「OpenAI」がアップデートされました！");

        let embed = &payload["embeds"][0];
        assert_eq!(embed["title"], "OpenAI (langgenius/openai)");
        assert_eq!(embed["url"], "https://marketplace.dify.ai/plugins/langgenius/openai");
        assert_eq!(embed["description"], UPDATED_INDICATOR);
        assert_eq!(embed["color"], 0x5865F2);
        assert_eq!(embed["fields"][0]["name"], VERSION_LABEL);
        assert_eq!(embed["fields"][0]["value"], "0.2.1");
        assert_eq!(embed["fields"][1]["value"], "2025年03月10日 14:31:12");
        assert_eq!(embed["fields"][2]["value"], "12,345");
        assert_eq!(embed["fields"][2]["inline"], true);
        assert_eq!(
            embed["footer"]["text"],
            "Dify Marketplace Watcher • 2025年03月10日 15:00:00"
        );
    }

    #[test]
    fn slack_payload_shape() {
        let payload = SLACK.render(&[info("OpenAI"), info("Gemini")], rendered_at());
        assert!(payload["text"].as_str().unwrap().starts_with("2個の"));

        let attachments = payload["attachments"].as_array().unwrap();
        assert_eq!(attachments.len(), 2);
        let first = &attachments[0];
        assert_eq!(first["title"], "OpenAI (langgenius/openai)");
        assert_eq!(first["title_link"], "https://marketplace.dify.ai/plugins/langgenius/openai");
        assert_eq!(first["text"], UPDATED_INDICATOR);
        assert_eq!(first["color"], "#36a64f");
        assert_eq!(first["fields"][1]["title"], UPDATED_AT_LABEL);
        assert_eq!(first["fields"][1]["short"], true);
        assert_eq!(first["footer"], "Dify Marketplace Watcher • 2025年03月10日 15:00:00");
    }

    #[test]
    fn both_channels_carry_same_information() {
        let updates = [info("OpenAI"), info("Gemini")];
        let discord = DISCORD.render(&updates, rendered_at());
        let slack = SLACK.render(&updates, rendered_at());
        for i in 0..2 {
            let d = &discord["embeds"][i];
            let s = &slack["attachments"][i];
            assert_eq!(d["title"], s["title"]);
            assert_eq!(d["url"], s["title_link"]);
            for f in 0..3 {
                assert_eq!(d["fields"][f]["value"], s["fields"][f]["value"]);
            }
        }
        assert_eq!(discord["content"], slack["text"]);
    }

    #[test]
    fn oversized_discord_payload_still_lists_every_update() {
        let updates: Vec<_> = (0..12).map(|i| info(&format!("P{i}"))).collect();
        assert!(DISCORD.exceeds_block_limit(updates.len()));
        let payload = DISCORD.render(&updates, rendered_at());
        assert_eq!(payload["embeds"].as_array().unwrap().len(), 12);
    }

    #[rstest]
    #[case(0, "0")]
    #[case(999, "999")]
    #[case(1000, "1,000")]
    #[case(1234567, "1,234,567")]
    fn groups_thousands(#[case] n: u64, #[case] expected: &str) {
        assert_eq!(group_thousands(n), expected);
    }
}
