use serde::{Deserialize, Serialize};

/// Inbound trigger payload, as delivered by a scheduler or invoked by hand.
///
/// Unknown keys are ignored so scheduler envelopes can be passed through as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerEvent {
    /// Send a synthetic notification to Slack only.
    pub test_slack: bool,
    /// Send a synthetic notification to Discord only.
    pub test_discord: bool,
}

impl TriggerEvent {
    /// Parse a JSON payload; blank input and `null` mean "no flags".
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw == "null" {
            return Ok(Self::default());
        }
        serde_json::from_str(raw)
    }

    pub fn is_test(&self) -> bool {
        self.test_slack || self.test_discord
    }

    /// Flags from both events; used to combine a payload with CLI switches.
    pub fn merge(self, other: Self) -> Self {
        Self {
            test_slack: self.test_slack || other.test_slack,
            test_discord: self.test_discord || other.test_discord,
        }
    }
}
