use {
    chrono::{DateTime, TimeDelta, Utc},
    tracing::{debug, warn},
};

use crate::{extract::PluginVersionInfo, timestamp::parse_utc};

/// Records updated at or after `now - window`, in input order.
///
/// `now` is taken once by the caller so every comparison uses the same threshold.
pub fn filter_recent(
    records: &[PluginVersionInfo],
    now: DateTime<Utc>,
    window: TimeDelta,
) -> Vec<PluginVersionInfo> {
    partition_recent(records, now, window).0
}

/// Split records into `(recent, not_recent)`, both in input order.
///
/// Records whose timestamp is the sentinel or otherwise unparsable are never recent.
pub fn partition_recent(
    records: &[PluginVersionInfo],
    now: DateTime<Utc>,
    window: TimeDelta,
) -> (Vec<PluginVersionInfo>, Vec<PluginVersionInfo>) {
    // A window reaching past chrono's range admits everything.
    let threshold = now
        .checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    debug!(threshold = %threshold, "filtering recently updated plugins");

    records.iter().cloned().partition(|record| {
        match parse_utc(&record.updated_at_utc) {
            Ok(updated_at) => updated_at >= threshold,
            Err(e) => {
                warn!(plugin = %record.name, error = %e, "unusable update time, treating as not recent");
                false
            },
        }
    })
}
