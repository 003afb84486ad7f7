//! Output and time budgets for tool invocations.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Budgets applied to tool output and external calls.
///
/// Every string a tool hands back to the agent is bounded: unbounded file
/// reads, directory dumps or process output would flood the model context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolLimits {
    /// Maximum characters returned by a file read.
    pub max_read_chars: usize,
    /// Maximum characters per captured process stream (stdout and stderr
    /// are truncated independently).
    pub max_stream_chars: usize,
    /// Maximum directory entries returned by a listing.
    pub max_list_entries: usize,
    /// Maximum characters of page text returned by the web fetch tool.
    pub max_fetch_chars: usize,
    /// Maximum data rows returned by the stock history tool.
    pub max_history_rows: usize,
    /// Wall-clock timeout for gated command execution.
    #[serde(with = "duration_secs")]
    pub command_timeout: Duration,
    /// Timeout for outbound HTTP requests.
    #[serde(with = "duration_secs")]
    pub http_timeout: Duration,
}

impl Default for ToolLimits {
    fn default() -> Self {
        Self {
            max_read_chars: 4000,
            max_stream_chars: 3000,
            max_list_entries: 50,
            max_fetch_chars: 5000,
            max_history_rows: 150,
            command_timeout: Duration::from_secs(60),
            http_timeout: Duration::from_secs(15),
        }
    }
}

/// Helper for serializing Duration as whole seconds
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Truncate `text` to at most `max_chars` characters, appending `marker`
/// when anything was cut.
///
/// Counts characters rather than bytes so a multi-byte boundary can never be
/// split. The marker is appended on top of the budget, matching what the
/// driving prompts have been tuned against.
pub fn truncate_chars(text: &str, max_chars: usize, marker: &str) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str(marker);
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = ToolLimits::default();
        assert_eq!(limits.max_read_chars, 4000);
        assert_eq!(limits.max_stream_chars, 3000);
        assert_eq!(limits.max_list_entries, 50);
        assert_eq!(limits.max_fetch_chars, 5000);
        assert_eq!(limits.max_history_rows, 150);
        assert_eq!(limits.command_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_limits_serialization_roundtrip() {
        let limits = ToolLimits {
            command_timeout: Duration::from_secs(30),
            ..ToolLimits::default()
        };
        let json = serde_json::to_string(&limits).unwrap();
        assert!(json.contains("\"command_timeout\":30"));
        let parsed: ToolLimits = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.command_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_truncate_under_budget_is_identity() {
        assert_eq!(truncate_chars("hello", 10, "..."), "hello");
    }

    #[test]
    fn test_truncate_at_budget_is_identity() {
        assert_eq!(truncate_chars("hello", 5, "..."), "hello");
    }

    #[test]
    fn test_truncate_over_budget_appends_marker() {
        let out = truncate_chars("hello world", 5, "\n... (truncated)");
        assert_eq!(out, "hello\n... (truncated)");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        // Four multi-byte characters; a byte-based cut would panic or split.
        let out = truncate_chars("éééé", 2, "+");
        assert_eq!(out, "éé+");
    }
}
