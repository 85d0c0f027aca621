//! Writer tuning knobs.

use serde::{Deserialize, Serialize};

/// Marker prepended to every line written through [`JobConsole::write_line`](crate::JobConsole::write_line)
/// so dashboard readers can tell agent output apart from other writers on
/// the same stream.
pub const AGENT_MARKER: &str = "[JobAgent]";

/// Size and framing settings for encoded lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Maximum encoded record size in bytes
    pub value_field_limit: usize,
    /// Upper bound on the framing bytes around the text (timestamp, color, JSON)
    pub reserved_overhead: usize,
    /// Prefix added to plain lines
    pub marker: String,
}

impl ConsoleConfig {
    /// Texts longer than this are spilled without trying to encode them first.
    pub fn inline_text_limit(&self) -> usize {
        self.value_field_limit.saturating_sub(self.reserved_overhead)
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            value_field_limit: 256,
            reserved_overhead: 36,
            marker: AGENT_MARKER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.value_field_limit, 256);
        assert_eq!(config.reserved_overhead, 36);
        assert_eq!(config.inline_text_limit(), 220);
        assert_eq!(config.marker, "[JobAgent]");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ConsoleConfig = serde_json::from_str(r#"{"marker":""}"#).unwrap();
        assert_eq!(config.marker, "");
        assert_eq!(config.value_field_limit, 256);
    }
}
