//! Typed webhook event model
//!
//! The capture application reports session milestones as query-string
//! callbacks. Events are validated once at the boundary into a `HookEvent`
//! plus `HookHints`; anything outside the whitelist is acknowledged by the
//! transport layer without touching session state.

use std::collections::HashMap;

/// Webhook event kinds accepted from the capture application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    /// A print job was started for the current session
    Printing,
    /// The capture application uploaded a file
    FileUpload,
    /// A capture session began
    SessionStart,
    /// A capture session finished and produced an asset
    SessionEnd,
    /// The capture application reported an error
    Error,
}

impl HookEvent {
    /// Parse an `event_type` value. Returns `None` for anything outside the
    /// whitelist so unrecognized events never reach the state machine.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "printing" => Some(HookEvent::Printing),
            "file_upload" => Some(HookEvent::FileUpload),
            "session_start" => Some(HookEvent::SessionStart),
            "session_end" => Some(HookEvent::SessionEnd),
            "error" => Some(HookEvent::Error),
            _ => None,
        }
    }

    /// Wire name as reported by the capture application
    pub fn name(&self) -> &'static str {
        match self {
            HookEvent::Printing => "printing",
            HookEvent::FileUpload => "file_upload",
            HookEvent::SessionStart => "session_start",
            HookEvent::SessionEnd => "session_end",
            HookEvent::Error => "error",
        }
    }
}

/// Optional hints carried in an event's query fields
#[derive(Debug, Clone, Default)]
pub struct HookHints {
    /// Filesystem path of the produced photo
    pub asset_path: Option<String>,
    /// Externally hosted sharing URL
    pub share_url: Option<String>,
    /// Error text accompanying an `error` event
    pub message: Option<String>,
}

impl HookHints {
    /// Extract hints from the raw query map, honoring the field aliases the
    /// capture application uses: `param1`/`path`/`file` for the asset path,
    /// `param2`/`share_url` for the share URL, `message` for error text.
    /// Values are whitespace-trimmed; empty values count as absent.
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        Self {
            asset_path: first_of(query, &["param1", "path", "file"]),
            share_url: first_of(query, &["param2", "share_url"]),
            message: first_of(query, &["message"]),
        }
    }
}

/// First non-empty value among the given keys, trimmed
fn first_of(query: &HashMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| query.get(*k))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn whitelist_rejects_unknown_events() {
        assert_eq!(HookEvent::from_name("session_start"), Some(HookEvent::SessionStart));
        assert_eq!(HookEvent::from_name("countdown"), None);
        assert_eq!(HookEvent::from_name(""), None);
        // Case-sensitive, matching the capture application's wire names
        assert_eq!(HookEvent::from_name("Session_Start"), None);
    }

    #[test]
    fn round_trip_names() {
        for name in ["printing", "file_upload", "session_start", "session_end", "error"] {
            let event = HookEvent::from_name(name).unwrap();
            assert_eq!(event.name(), name);
        }
    }

    #[test]
    fn hints_honor_aliases_in_priority_order() {
        let hints = HookHints::from_query(&query(&[
            ("path", "/tmp/from-path.jpg"),
            ("param1", "/tmp/from-param1.jpg"),
            ("share_url", "http://share/x"),
        ]));
        assert_eq!(hints.asset_path.as_deref(), Some("/tmp/from-param1.jpg"));
        assert_eq!(hints.share_url.as_deref(), Some("http://share/x"));
        assert!(hints.message.is_none());
    }

    #[test]
    fn hints_trim_whitespace_and_skip_empty() {
        let hints = HookHints::from_query(&query(&[
            ("param1", "  /tmp/padded.jpg  "),
            ("param2", "   "),
        ]));
        assert_eq!(hints.asset_path.as_deref(), Some("/tmp/padded.jpg"));
        assert!(hints.share_url.is_none());
    }
}
