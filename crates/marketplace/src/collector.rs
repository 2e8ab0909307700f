use tracing::{info, warn};

use crate::{
    client::PluginSource,
    extract::{PluginVersionInfo, extract},
};

/// Fetch and extract every identifier, in order, one at a time.
///
/// Identifiers that fail to fetch or carry no plugin data are logged and
/// dropped; the rest keep their input order.
pub async fn collect_all<S>(source: &S, identifiers: &[String]) -> Vec<PluginVersionInfo>
where
    S: PluginSource + ?Sized,
{
    info!(count = identifiers.len(), "collecting plugin versions");
    let mut collected = Vec::with_capacity(identifiers.len());

    for identifier in identifiers {
        let doc = match source.fetch(identifier).await {
            Ok(doc) => doc,
            Err(e) => {
                warn!(identifier = %identifier, error = %e, "failed to fetch plugin, skipping");
                continue;
            },
        };

        let Some(info) = extract(&doc, &source.plugin_url(identifier)) else {
            warn!(identifier = %identifier, "response has no data.plugin, skipping");
            continue;
        };

        info!(
            plugin = %info.name,
            plugin_id = %info.plugin_id,
            version = %info.latest_version,
            updated_at = %info.updated_at_utc,
            install_count = info.install_count,
            "fetched plugin"
        );
        collected.push(info);
    }

    info!(
        fetched = collected.len(),
        requested = identifiers.len(),
        "plugin collection finished"
    );
    collected
}
