//! Fire-and-forget helper script launching
//!
//! Session milestones hand control back to the kiosk machine by launching
//! helper scripts (switch the display to the booth app, push the result to
//! the web view). Launches are detached child processes: the spawn returns
//! immediately and any failure is logged and absorbed, never surfaced as a
//! session-transition failure.

use boothwall_common::config::BoothConfig;
use boothwall_common::events::HookEvent;
use std::path::PathBuf;
use std::process::Command;
use tracing::{info, warn};

/// Narrow capability handle for launching helper scripts
pub struct ScriptLauncher {
    scripts_dir: PathBuf,
    enter_session_script: String,
    session_end_script: String,
}

impl ScriptLauncher {
    pub fn new(
        scripts_dir: PathBuf,
        enter_session_script: String,
        session_end_script: String,
    ) -> Self {
        Self {
            scripts_dir,
            enter_session_script,
            session_end_script,
        }
    }

    pub fn from_config(config: &BoothConfig) -> Self {
        Self::new(
            config.scripts_dir(),
            config.enter_session_script.clone(),
            config.session_end_script.clone(),
        )
    }

    /// Launch the helper that puts the kiosk into capture mode
    pub fn enter_session(&self) {
        self.launch(&self.enter_session_script);
    }

    /// Helper script mapped to a webhook event, if any
    pub fn action_for_event(&self, event: HookEvent) -> Option<&str> {
        match event {
            HookEvent::SessionEnd => Some(&self.session_end_script),
            _ => None,
        }
    }

    /// Spawn a helper script as a detached child process
    pub fn launch(&self, script_name: &str) {
        let script_path = self.scripts_dir.join(script_name);
        if !script_path.is_file() {
            warn!("Script not found: {}", script_path.display());
            return;
        }

        let mut command = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/c").arg(&script_path);
            c
        } else {
            Command::new(&script_path)
        };

        match command.spawn() {
            Ok(child) => info!(
                "Started helper script {} (pid {})",
                script_path.display(),
                child.id()
            ),
            Err(e) => warn!("Failed to start helper script {}: {}", script_path.display(), e),
        }
    }
}
