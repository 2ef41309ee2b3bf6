/// Session activity log
///
/// Every label commit, export and submission is recorded with a sequence
/// number and timestamp under one session id. The log can be exported as
/// human-readable text or JSON.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

/// A single recorded event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Sequential event number (1-based)
    pub sequence: usize,
    pub timestamp: DateTime<Local>,
    /// Short event name, e.g. "Label" or "Submit"
    pub event: String,
    pub detail: String,
}

impl ActivityEntry {
    pub fn to_text(&self) -> String {
        format!(
            "[{:03}] {} | {} | {}",
            self.sequence,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.event,
            self.detail
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    pub session_id: String,
    pub session_start: DateTime<Local>,
    pub data_dir: String,
    pub software_version: String,
    pub entries: Vec<ActivityEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            session_start: Local::now(),
            data_dir: String::new(),
            software_version: env!("CARGO_PKG_VERSION").to_string(),
            entries: Vec::new(),
        }
    }

    /// First 8 hex digits of the session id, used in remote file names
    pub fn session_tag(&self) -> String {
        self.session_id.chars().filter(|c| *c != '-').take(8).collect()
    }

    pub fn set_data_dir(&mut self, dir: &str) {
        self.data_dir = dir.to_string();
    }

    pub fn add_entry(&mut self, event: &str, detail: &str) {
        let seq = self.entries.len() + 1;
        self.entries.push(ActivityEntry {
            sequence: seq,
            timestamp: Local::now(),
            event: event.to_string(),
            detail: detail.to_string(),
        });
        log::info!("[ACT {:03}] {} — {}", seq, event, detail);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("═══════════════════════════════════════════════════════════════\n");
        out.push_str("  Storm Labeling Session Log\n");
        out.push_str("═══════════════════════════════════════════════════════════════\n");
        out.push_str(&format!("  Session ID:  {}\n", self.session_id));
        out.push_str(&format!(
            "  Started:     {}\n",
            self.session_start.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&format!("  Images:      {}\n", self.data_dir));
        out.push_str(&format!("  Software:    storm-labeler v{}\n", self.software_version));
        out.push_str(&format!("  Events:      {}\n", self.entries.len()));
        out.push_str("───────────────────────────────────────────────────────────────\n\n");

        for entry in &self.entries {
            out.push_str(&entry.to_text());
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {}", e))
    }

    pub fn save_text(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.to_text())
    }

    pub fn save_json(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.to_json())
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_sequenced() {
        let mut log = ActivityLog::new();
        assert!(log.is_empty());
        log.add_entry("Label", "(1, 2) -> Large Circular");
        log.add_entry("Export", "storm_labels.csv");
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries[0].sequence, 1);
        assert_eq!(log.entries[1].event, "Export");
    }

    #[test]
    fn test_session_tag() {
        let log = ActivityLog::new();
        let tag = log.session_tag();
        assert_eq!(tag.len(), 8);
        assert!(tag.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(log.session_id.starts_with(&tag[..8]));
    }

    #[test]
    fn test_text_export() {
        let mut log = ActivityLog::new();
        log.set_data_dir("storm_images_cleaned");
        log.add_entry("Submit", "user_classifications/x.csv");
        let text = log.to_text();
        assert!(text.contains("storm_images_cleaned"));
        assert!(text.contains("user_classifications/x.csv"));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut log = ActivityLog::new();
        log.add_entry("Label", "detail");
        let parsed: ActivityLog = serde_json::from_str(&log.to_json()).unwrap();
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.session_id, log.session_id);
    }
}
