use {
    serde::{Deserialize, Serialize},
    serde_json::Value,
};

use crate::timestamp::display_local;

/// Placeholder for fields the marketplace did not provide.
pub const UNKNOWN: &str = "unknown";

/// Lookup paths tried in order; the first string hit wins.
const NAME_FIELDS: &[&[&str]] = &[&["label", "en_US"], &["name"]];
const PLUGIN_ID_FIELDS: &[&[&str]] = &[&["plugin_id"]];
const VERSION_FIELDS: &[&[&str]] = &[&["latest_version"]];
const UPDATED_AT_FIELDS: &[&[&str]] = &[&["version_updated_at"], &["updated_at"]];

/// Normalized view of one marketplace plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginVersionInfo {
    pub name: String,
    pub plugin_id: String,
    pub latest_version: String,
    /// Raw UTC timestamp exactly as the marketplace sent it.
    #[serde(rename = "version_updated_at")]
    pub updated_at_utc: String,
    /// Display-only rendering of `updated_at_utc` in UTC+9.
    pub updated_at_local: String,
    pub install_count: u64,
    pub url: String,
}

impl PluginVersionInfo {
    /// Build a record, deriving the local display time from `updated_at_utc`.
    pub fn new(
        name: impl Into<String>,
        plugin_id: impl Into<String>,
        latest_version: impl Into<String>,
        updated_at_utc: impl Into<String>,
        install_count: u64,
        url: impl Into<String>,
    ) -> Self {
        let updated_at_utc = updated_at_utc.into();
        Self {
            name: name.into(),
            plugin_id: plugin_id.into(),
            latest_version: latest_version.into(),
            updated_at_local: display_local(&updated_at_utc),
            updated_at_utc,
            install_count,
            url: url.into(),
        }
    }
}

/// Map a raw API document onto a record.
///
/// Returns `None` when `data.plugin` is missing; every other gap is filled
/// with [`UNKNOWN`] (or `0` for the install count). `url` is the caller's,
/// derived from the identifier rather than anything in the document.
pub fn extract(doc: &Value, url: &str) -> Option<PluginVersionInfo> {
    let plugin = doc.get("data")?.get("plugin")?;
    if !plugin.is_object() {
        return None;
    }

    Some(PluginVersionInfo::new(
        first_str(plugin, NAME_FIELDS),
        first_str(plugin, PLUGIN_ID_FIELDS),
        first_str(plugin, VERSION_FIELDS),
        first_str(plugin, UPDATED_AT_FIELDS),
        plugin
            .get("install_count")
            .and_then(Value::as_u64)
            .unwrap_or(0),
        url,
    ))
}

fn first_str(value: &Value, paths: &[&[&str]]) -> String {
    paths
        .iter()
        .find_map(|path| {
            path.iter()
                .try_fold(value, |v, key| v.get(key))
                .and_then(Value::as_str)
        })
        .unwrap_or(UNKNOWN)
        .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, serde_json::json};

    const URL: &str = "https://marketplace.dify.ai/plugins/langgenius/openai";

    #[test]
    fn extracts_full_document() {
        let doc = json!({
            "data": { "plugin": {
                "label": { "en_US": "OpenAI", "ja_JP": "OpenAI (JP)" },
                "name": "openai",
                "plugin_id": "langgenius/openai",
                "latest_version": "0.2.1",
                "version_updated_at": "2025-03-10T05:31:12.123456Z",
                "updated_at": "2025-01-01T00:00:00Z",
                "install_count": 4242,
                "url": "https://elsewhere.example/ignored"
            }}
        });

        let info = extract(&doc, URL).unwrap();
        assert_eq!(info.name, "OpenAI");
        assert_eq!(info.plugin_id, "langgenius/openai");
        assert_eq!(info.latest_version, "0.2.1");
        assert_eq!(info.updated_at_utc, "2025-03-10T05:31:12.123456Z");
        assert_eq!(info.updated_at_local, "2025年03月10日 14:31:12");
        assert_eq!(info.install_count, 4242);
        assert_eq!(info.url, URL);
    }

    #[test]
    fn name_falls_back_to_plain_name_then_sentinel() {
        let doc = json!({ "data": { "plugin": { "label": { "zh_Hans": "x" }, "name": "openai" } } });
        assert_eq!(extract(&doc, URL).unwrap().name, "openai");

        let doc = json!({ "data": { "plugin": {} } });
        assert_eq!(extract(&doc, URL).unwrap().name, UNKNOWN);
    }

    #[test]
    fn updated_at_falls_back_to_updated_at() {
        let doc = json!({ "data": { "plugin": { "updated_at": "2025-02-01T10:00:00Z" } } });
        let info = extract(&doc, URL).unwrap();
        assert_eq!(info.updated_at_utc, "2025-02-01T10:00:00Z");
        assert_eq!(info.updated_at_local, "2025年02月01日 19:00:00");
    }

    #[test]
    fn missing_fields_use_sentinels() {
        let doc = json!({ "data": { "plugin": { "install_count": null } } });
        let info = extract(&doc, URL).unwrap();
        assert_eq!(info.plugin_id, UNKNOWN);
        assert_eq!(info.latest_version, UNKNOWN);
        assert_eq!(info.updated_at_utc, UNKNOWN);
        assert_eq!(info.updated_at_local, UNKNOWN);
        assert_eq!(info.install_count, 0);
    }

    #[test]
    fn missing_plugin_object_is_none() {
        assert!(extract(&json!({}), URL).is_none());
        assert!(extract(&json!({ "data": {} }), URL).is_none());
        assert!(extract(&json!({ "data": { "plugin": null } }), URL).is_none());
    }

    #[test]
    fn serializes_with_wire_keys() {
        let info = PluginVersionInfo::new("A", "a/a", "1.0.0", "2025-01-01T00:00:00Z", 3, URL);
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["version_updated_at"], "2025-01-01T00:00:00Z");
        assert_eq!(value["updated_at_local"], "2025年01月01日 09:00:00");
        assert_eq!(value["install_count"], 3);
    }
}
