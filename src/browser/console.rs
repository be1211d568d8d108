//! Console log snapshots and the JavaScript error check.
//!
//! The server accumulates console messages and hands the whole list back on
//! request; nothing is pushed. The client keeps the last-seen snapshot and
//! diffs against its length on each check, so only entries appended since
//! the previous check are considered.
//!
//! An appended entry whose message contains the substring `Error:` marks the
//! diff as a JavaScript failure. The substring check is a convention of the
//! server's log format and is preserved as-is, false positives included,
//! because its exact behavior is observable compatibility.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::Browser;

// ============================================================================
// ConsoleEntry
// ============================================================================

/// One console log entry as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    /// Source line number, when the server reports one.
    #[serde(default)]
    pub line_number: Option<i64>,
    /// The logged message.
    #[serde(default)]
    pub message: String,
}

// ============================================================================
// Snapshot Diffing
// ============================================================================

/// Splits off the entries appended since the cached snapshot and reports
/// whether any of them looks like a JavaScript error.
pub(crate) fn fresh_entries(cached_len: usize, snapshot: &[ConsoleEntry]) -> (Vec<ConsoleEntry>, bool) {
    let fresh: Vec<ConsoleEntry> = snapshot.get(cached_len..).unwrap_or_default().to_vec();
    let has_error = fresh.iter().any(|entry| entry.message.contains("Error:"));
    (fresh, has_error)
}

// ============================================================================
// Browser - Console Log
// ============================================================================

impl Browser {
    /// Fetches the server's current console-message snapshot.
    pub async fn console_messages(&mut self) -> Result<Vec<ConsoleEntry>> {
        let payload = self.execute_text("ConsoleMessages", &[]).await?;
        Ok(serde_json::from_str(&payload)?)
    }

    /// Returns the last-seen console snapshot.
    #[inline]
    #[must_use]
    pub fn console_log(&self) -> &[ConsoleEntry] {
        &self.console_log
    }

    /// Refreshes the cached console snapshot.
    ///
    /// With `raise_on_js_error` set, any entry appended since the previous
    /// snapshot whose message contains `Error:` raises
    /// [`Error::JavaScript`] carrying the full batch of new entries. The
    /// cache is replaced unconditionally, whether or not an error is raised,
    /// so the next check only considers entries newer still.
    pub async fn update_console_log(&mut self, raise_on_js_error: bool) -> Result<()> {
        let snapshot = self.console_messages().await?;

        if raise_on_js_error {
            let (fresh, has_error) = fresh_entries(self.console_log.len(), &snapshot);
            self.console_log = snapshot;
            if has_error {
                debug!(new_entries = fresh.len(), "JavaScript error in console diff");
                return Err(Error::javascript(fresh));
            }
        } else {
            self.console_log = snapshot;
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(line: i64, message: &str) -> ConsoleEntry {
        ConsoleEntry {
            line_number: Some(line),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_unchanged_snapshot_yields_no_fresh_entries() {
        let snapshot = vec![entry(1, "ReferenceError: x is not defined")];
        let (fresh, has_error) = fresh_entries(snapshot.len(), &snapshot);
        assert!(fresh.is_empty());
        assert!(!has_error);
    }

    #[test]
    fn test_new_error_entry_is_flagged() {
        let snapshot = vec![
            entry(1, "page loaded"),
            entry(7, "TypeError: undefined is not a function"),
        ];
        let (fresh, has_error) = fresh_entries(1, &snapshot);
        assert_eq!(fresh, vec![entry(7, "TypeError: undefined is not a function")]);
        assert!(has_error);
    }

    #[test]
    fn test_diff_carries_all_new_entries_not_just_the_offender() {
        let snapshot = vec![
            entry(1, "before"),
            entry(2, "harmless"),
            entry(3, "Error: boom"),
            entry(4, "after"),
        ];
        let (fresh, has_error) = fresh_entries(1, &snapshot);
        assert_eq!(fresh.len(), 3);
        assert!(has_error);
    }

    #[test]
    fn test_plain_entries_raise_nothing() {
        let snapshot = vec![entry(1, "hello"), entry(2, "world")];
        let (fresh, has_error) = fresh_entries(0, &snapshot);
        assert_eq!(fresh.len(), 2);
        assert!(!has_error);
    }

    #[test]
    fn test_error_substring_heuristic_matches_mid_message() {
        // A page legitimately logging "Error:" trips the check; the blunt
        // substring match is part of observable compatibility.
        let snapshot = vec![entry(1, "note: Error: looks scary but is a log line")];
        let (_, has_error) = fresh_entries(0, &snapshot);
        assert!(has_error);
    }

    #[test]
    fn test_console_entry_deserializes_server_json() {
        let json = r#"[{"line_number":12,"message":"hi"},{"message":"no line"}]"#;
        let entries: Vec<ConsoleEntry> = serde_json::from_str(json).expect("parse");
        assert_eq!(entries[0], entry(12, "hi"));
        assert_eq!(entries[1].line_number, None);
        assert_eq!(entries[1].message, "no line");
    }
}
