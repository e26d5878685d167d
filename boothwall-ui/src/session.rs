//! Session lifecycle tracking
//!
//! One capture session exists at a time. The tracker owns the single session
//! record behind a mutex, mutated by UI requests (`start`/`reset`) and by
//! webhook events from the capture application (`handle_event`). Critical
//! sections only copy state; the file-existence probe for the derived
//! `asset_url` runs after the lock is released.

use boothwall_common::events::{HookEvent, HookHints};
use boothwall_common::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;
use uuid::Uuid;

use crate::launcher::ScriptLauncher;

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    InProgress,
    Completed,
    Error,
}

/// The single session record
#[derive(Debug, Clone)]
struct SessionState {
    status: SessionStatus,
    last_event: Option<String>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    asset_path: Option<String>,
    asset_token: Option<String>,
    share_url: Option<String>,
    error: Option<String>,
}

impl SessionState {
    fn idle() -> Self {
        Self {
            status: SessionStatus::Idle,
            last_event: None,
            started_at: None,
            completed_at: None,
            asset_path: None,
            asset_token: None,
            share_url: None,
            error: None,
        }
    }
}

/// Read-only copy of the session record handed to callers
///
/// `asset_url` is present iff an asset path is set, a retrieval token was
/// minted, and the file still exists on disk. `asset_name` is present
/// whenever an asset path is set, regardless of file existence.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub last_event: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub asset_path: Option<String>,
    pub asset_token: Option<String>,
    pub share_url: Option<String>,
    pub error: Option<String>,
    pub asset_url: Option<String>,
    pub asset_name: Option<String>,
}

/// Result of a `start` request
#[derive(Debug)]
pub enum StartOutcome {
    /// A new session was started
    Started(SessionSnapshot),
    /// A session is already running; carries the unchanged snapshot
    AlreadyRunning(SessionSnapshot),
}

/// Tracks the lifecycle of the single current capture session
pub struct SessionTracker {
    state: Mutex<SessionState>,
    launcher: Arc<ScriptLauncher>,
}

impl SessionTracker {
    pub fn new(launcher: Arc<ScriptLauncher>) -> Self {
        Self {
            state: Mutex::new(SessionState::idle()),
            launcher,
        }
    }

    /// Start a new session from the UI
    ///
    /// Rejected while a session is in progress; the caller gets the unchanged
    /// snapshot back. On success all prior session data is cleared and the
    /// enter-session helper script is launched fire-and-forget.
    pub fn start(&self) -> StartOutcome {
        let (started, raw) = {
            let mut state = self.state.lock().unwrap();
            if state.status == SessionStatus::InProgress {
                (false, state.clone())
            } else {
                *state = SessionState::idle();
                state.status = SessionStatus::InProgress;
                state.last_event = Some("session_start_manual".to_string());
                state.started_at = Some(Utc::now());
                (true, state.clone())
            }
        };

        if started {
            // Launch failure only loses the side effect, never the transition
            self.launcher.enter_session();
            StartOutcome::Started(derive_snapshot(raw))
        } else {
            StartOutcome::AlreadyRunning(derive_snapshot(raw))
        }
    }

    /// Return the session to the idle baseline (retake button, error recovery)
    pub fn reset(&self) -> SessionSnapshot {
        let raw = {
            let mut state = self.state.lock().unwrap();
            *state = SessionState::idle();
            state.last_event = Some("manual_reset".to_string());
            state.clone()
        };
        derive_snapshot(raw)
    }

    /// Read-only snapshot for status polling
    pub fn snapshot(&self) -> SessionSnapshot {
        let raw = self.state.lock().unwrap().clone();
        derive_snapshot(raw)
    }

    /// Apply a webhook event from the capture application
    ///
    /// Every event first merges its hints into the record (`last_event`,
    /// asset-path and share-url overwrites), then the event-specific branch
    /// runs. A fresh asset token is minted on every completion, so a token
    /// from an earlier session never validates against a new asset.
    pub fn handle_event(&self, event: HookEvent, hints: &HookHints) -> SessionSnapshot {
        let raw = {
            let mut state = self.state.lock().unwrap();
            state.last_event = Some(event.name().to_string());
            if let Some(path) = &hints.asset_path {
                state.asset_path = Some(path.clone());
            }
            if let Some(url) = &hints.share_url {
                state.share_url = Some(url.clone());
            }

            match event {
                HookEvent::SessionStart => {
                    state.status = SessionStatus::InProgress;
                    state.error = None;
                }
                HookEvent::Error => {
                    state.status = SessionStatus::Error;
                    state.error = Some(
                        hints
                            .message
                            .clone()
                            .unwrap_or_else(|| "Unknown capture error".to_string()),
                    );
                }
                HookEvent::SessionEnd => {
                    let final_path = hints.asset_path.clone().or_else(|| state.asset_path.clone());
                    let final_share = hints.share_url.clone().or_else(|| state.share_url.clone());
                    state.asset_token = final_path.as_ref().map(|_| mint_token());
                    state.asset_path = final_path;
                    state.share_url = final_share;
                    state.status = SessionStatus::Completed;
                    state.completed_at = Some(Utc::now());
                    state.error = None;
                }
                HookEvent::Printing | HookEvent::FileUpload => {}
            }
            state.clone()
        };

        if event == HookEvent::SessionEnd {
            info!("Session completed (asset: {:?})", raw.asset_path);
        }
        if let Some(script) = self.launcher.action_for_event(event) {
            self.launcher.launch(script);
        }

        derive_snapshot(raw)
    }

    /// Resolve the asset file to stream back for a retrieval request
    ///
    /// A supplied token must match the most recently minted one; a mismatch
    /// is reported as not-found so token validity never leaks. A vanished
    /// file is recorded in the session's `error` field before failing.
    pub fn asset_for_retrieval(&self, token: Option<&str>) -> Result<PathBuf> {
        let (path, stored_token) = {
            let state = self.state.lock().unwrap();
            (state.asset_path.clone(), state.asset_token.clone())
        };

        let (path, stored_token) = match (path, stored_token) {
            (Some(path), Some(token)) => (path, token),
            _ => return Err(Error::NotFound("No photo available yet".to_string())),
        };

        if let Some(supplied) = token {
            if supplied != stored_token {
                return Err(Error::NotFound("Photo token mismatch".to_string()));
            }
        }

        let path = PathBuf::from(path);
        if !path.is_file() {
            self.state.lock().unwrap().error = Some("Asset file missing on disk".to_string());
            return Err(Error::NotFound("Photo file not found".to_string()));
        }

        Ok(path)
    }
}

/// Opaque per-completion token binding asset retrieval to one session
fn mint_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Compute the derived asset fields; runs without the state lock held
fn derive_snapshot(state: SessionState) -> SessionSnapshot {
    let asset_name = state.asset_path.as_ref().map(|p| {
        Path::new(p)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| p.clone())
    });
    let asset_url = match (&state.asset_path, &state.asset_token) {
        (Some(path), Some(token)) if Path::new(path).is_file() => {
            Some(format!("/session/asset?token={}", token))
        }
        _ => None,
    };

    SessionSnapshot {
        status: state.status,
        last_event: state.last_event,
        started_at: state.started_at,
        completed_at: state.completed_at,
        asset_path: state.asset_path,
        asset_token: state.asset_token,
        share_url: state.share_url,
        error: state.error,
        asset_url,
        asset_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tracker() -> SessionTracker {
        // Scripts directory intentionally absent; launches degrade to warnings
        let launcher = ScriptLauncher::new(
            PathBuf::from("scripts-missing"),
            "toBooth.bat".to_string(),
            "toWeb.bat".to_string(),
        );
        SessionTracker::new(Arc::new(launcher))
    }

    fn end_hints(path: &str, share: Option<&str>) -> HookHints {
        HookHints {
            asset_path: Some(path.to_string()),
            share_url: share.map(|s| s.to_string()),
            message: None,
        }
    }

    #[test]
    fn start_transitions_to_in_progress() {
        let tracker = tracker();
        match tracker.start() {
            StartOutcome::Started(snapshot) => {
                assert_eq!(snapshot.status, SessionStatus::InProgress);
                assert!(snapshot.started_at.is_some());
                assert!(snapshot.asset_path.is_none());
            }
            StartOutcome::AlreadyRunning(_) => panic!("first start must succeed"),
        }
    }

    #[test]
    fn start_while_running_is_rejected_without_mutation() {
        let tracker = tracker();
        let first = match tracker.start() {
            StartOutcome::Started(s) => s,
            StartOutcome::AlreadyRunning(_) => panic!("first start must succeed"),
        };

        match tracker.start() {
            StartOutcome::AlreadyRunning(snapshot) => {
                assert_eq!(snapshot.status, SessionStatus::InProgress);
                assert_eq!(snapshot.started_at, first.started_at);
                assert_eq!(snapshot.last_event.as_deref(), Some("session_start_manual"));
            }
            StartOutcome::Started(_) => panic!("second start must conflict"),
        }
    }

    #[test]
    fn webhook_session_flow_completes_and_mints_token() {
        let tracker = tracker();

        tracker.handle_event(HookEvent::SessionStart, &HookHints::default());
        assert_eq!(tracker.snapshot().status, SessionStatus::InProgress);

        let snapshot = tracker.handle_event(
            HookEvent::SessionEnd,
            &end_hints("/tmp/photo123.jpg", Some("http://share/x")),
        );
        assert_eq!(snapshot.status, SessionStatus::Completed);
        assert_eq!(snapshot.asset_path.as_deref(), Some("/tmp/photo123.jpg"));
        assert_eq!(snapshot.share_url.as_deref(), Some("http://share/x"));
        assert!(snapshot.asset_token.is_some());
        assert!(snapshot.completed_at.is_some());
        assert_eq!(snapshot.asset_name.as_deref(), Some("photo123.jpg"));
        // File does not exist on disk, so no retrievable URL is derived
        assert!(snapshot.asset_url.is_none());
    }

    #[test]
    fn asset_url_derived_only_while_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("shot.jpg");
        std::fs::File::create(&photo)
            .unwrap()
            .write_all(b"jpeg bytes")
            .unwrap();

        let tracker = tracker();
        tracker.handle_event(
            HookEvent::SessionEnd,
            &end_hints(photo.to_str().unwrap(), None),
        );

        let snapshot = tracker.snapshot();
        let token = snapshot.asset_token.clone().unwrap();
        assert_eq!(
            snapshot.asset_url.as_deref(),
            Some(format!("/session/asset?token={}", token).as_str())
        );

        std::fs::remove_file(&photo).unwrap();
        assert!(tracker.snapshot().asset_url.is_none());
    }

    #[test]
    fn token_is_reminted_per_completion_and_stale_tokens_fail() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("shot.jpg");
        std::fs::write(&photo, b"jpeg bytes").unwrap();
        let path = photo.to_str().unwrap();

        let tracker = tracker();
        let first = tracker.handle_event(HookEvent::SessionEnd, &end_hints(path, None));
        let second = tracker.handle_event(HookEvent::SessionEnd, &end_hints(path, None));

        let old = first.asset_token.unwrap();
        let new = second.asset_token.unwrap();
        assert_ne!(old, new);

        assert!(matches!(
            tracker.asset_for_retrieval(Some(&old)),
            Err(Error::NotFound(_))
        ));
        assert_eq!(tracker.asset_for_retrieval(Some(&new)).unwrap(), photo);
    }

    #[test]
    fn retrieval_without_asset_is_not_found() {
        let tracker = tracker();
        assert!(matches!(
            tracker.asset_for_retrieval(None),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn retrieval_of_vanished_file_records_error() {
        let tracker = tracker();
        tracker.handle_event(HookEvent::SessionEnd, &end_hints("/tmp/gone-away.jpg", None));

        assert!(matches!(
            tracker.asset_for_retrieval(None),
            Err(Error::NotFound(_))
        ));
        assert_eq!(
            tracker.snapshot().error.as_deref(),
            Some("Asset file missing on disk")
        );
    }

    #[test]
    fn session_end_without_any_path_leaves_token_unset() {
        let tracker = tracker();
        let snapshot = tracker.handle_event(HookEvent::SessionEnd, &HookHints::default());
        assert_eq!(snapshot.status, SessionStatus::Completed);
        assert!(snapshot.asset_path.is_none());
        assert!(snapshot.asset_token.is_none());
    }

    #[test]
    fn error_event_records_message() {
        let tracker = tracker();
        let hints = HookHints {
            message: Some("lens cap on".to_string()),
            ..HookHints::default()
        };
        let snapshot = tracker.handle_event(HookEvent::Error, &hints);
        assert_eq!(snapshot.status, SessionStatus::Error);
        assert_eq!(snapshot.error.as_deref(), Some("lens cap on"));

        let snapshot = tracker.handle_event(HookEvent::Error, &HookHints::default());
        assert_eq!(snapshot.error.as_deref(), Some("Unknown capture error"));
    }

    #[test]
    fn merge_only_events_keep_status_but_update_hints() {
        let tracker = tracker();
        tracker.handle_event(HookEvent::SessionStart, &HookHints::default());

        let snapshot = tracker.handle_event(
            HookEvent::FileUpload,
            &end_hints("/tmp/uploaded.jpg", None),
        );
        assert_eq!(snapshot.status, SessionStatus::InProgress);
        assert_eq!(snapshot.asset_path.as_deref(), Some("/tmp/uploaded.jpg"));
        assert_eq!(snapshot.last_event.as_deref(), Some("file_upload"));
    }

    #[test]
    fn reset_returns_to_idle_baseline() {
        let tracker = tracker();
        tracker.handle_event(HookEvent::SessionEnd, &end_hints("/tmp/x.jpg", None));

        let snapshot = tracker.reset();
        assert_eq!(snapshot.status, SessionStatus::Idle);
        assert_eq!(snapshot.last_event.as_deref(), Some("manual_reset"));
        assert!(snapshot.asset_path.is_none());
        assert!(snapshot.asset_token.is_none());
        assert!(snapshot.error.is_none());
    }
}
