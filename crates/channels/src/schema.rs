use {serde::Serialize, serde_json::Value};

/// Channel families the watcher can post to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Discord,
    Slack,
}

impl ChannelKind {
    pub const ALL: [Self; 2] = [Self::Discord, Self::Slack];

    /// Channel identifier (e.g. "discord", "slack").
    pub fn id(self) -> &'static str {
        match self {
            Self::Discord => "discord",
            Self::Slack => "slack",
        }
    }

    pub fn schema(self) -> &'static ChannelSchema {
        match self {
            Self::Discord => &DISCORD,
            Self::Slack => &SLACK,
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// How a channel expects its accent color.
#[derive(Debug, Clone, Copy)]
pub enum BrandColor {
    /// Integer RGB (Discord embeds).
    Rgb(u32),
    /// `#rrggbb` string (Slack attachments).
    Hex(&'static str),
}

impl BrandColor {
    pub fn to_value(self) -> Value {
        match self {
            Self::Rgb(rgb) => Value::from(rgb),
            Self::Hex(hex) => Value::from(hex),
        }
    }
}

/// How a channel expects the footer.
#[derive(Debug, Clone, Copy)]
pub enum FooterStyle {
    /// `{"text": "..."}`
    Object,
    /// Plain string.
    Text,
}

/// Payload layout and delivery contract for one channel.
#[derive(Debug, Clone)]
pub struct ChannelSchema {
    pub kind: ChannelKind,
    /// Status the webhook answers with when the message was accepted.
    pub success_status: u16,
    pub color: BrandColor,
    /// Top-level key holding the headline sentence.
    pub headline_key: &'static str,
    /// Top-level key holding the per-plugin blocks.
    pub blocks_key: &'static str,
    /// Block key for the link target of the title.
    pub link_key: &'static str,
    /// Block key for the "updated" indicator.
    pub body_key: &'static str,
    pub field_label_key: &'static str,
    pub field_inline_key: &'static str,
    pub footer: FooterStyle,
    /// Most blocks the channel accepts in one message, if it enforces a cap.
    pub max_blocks: Option<usize>,
}

impl ChannelSchema {
    pub fn exceeds_block_limit(&self, blocks: usize) -> bool {
        self.max_blocks.is_some_and(|max| blocks > max)
    }
}

/// Discord webhooks reply `204 No Content` unless `?wait=true` is set.
pub const DISCORD: ChannelSchema = ChannelSchema {
    kind: ChannelKind::Discord,
    success_status: 204,
    color: BrandColor::Rgb(0x5865F2),
    headline_key: "content",
    blocks_key: "embeds",
    link_key: "url",
    body_key: "description",
    field_label_key: "name",
    field_inline_key: "inline",
    footer: FooterStyle::Object,
    max_blocks: Some(10),
};

/// Slack incoming webhooks reply `200 ok`.
pub const SLACK: ChannelSchema = ChannelSchema {
    kind: ChannelKind::Slack,
    success_status: 200,
    color: BrandColor::Hex("#36a64f"),
    headline_key: "text",
    blocks_key: "attachments",
    link_key: "title_link",
    body_key: "text",
    field_label_key: "title",
    field_inline_key: "short",
    footer: FooterStyle::Text,
    max_blocks: None,
};
