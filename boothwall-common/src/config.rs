//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default listen port for the coordinator
pub const DEFAULT_PORT: u16 = 8000;

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct BoothConfig {
    /// Root folder holding `static/` and `scripts/`
    pub root_folder: PathBuf,
    /// Listen port on 127.0.0.1
    pub port: u16,
    /// Helper script launched when a session is started from the UI
    pub enter_session_script: String,
    /// Helper script launched when the capture application reports session_end
    pub session_end_script: String,
}

/// Optional settings read from the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub root_folder: Option<String>,
    pub port: Option<u16>,
    pub enter_session_script: Option<String>,
    pub session_end_script: Option<String>,
}

/// Resolve the full configuration following the priority order:
/// 1. Command-line argument / environment variable (highest priority)
/// 2. TOML config file
/// 3. OS-dependent compiled default (fallback)
///
/// `cli_root` and `cli_port` carry both CLI and environment values (the CLI
/// parser falls back to `BOOTHWALL_ROOT` / `BOOTHWALL_PORT` itself).
pub fn resolve_config(cli_root: Option<&str>, cli_port: Option<u16>) -> BoothConfig {
    let file = match load_config_file() {
        Some(path) => match read_config_file(&path) {
            Ok(file) => {
                tracing::debug!("Loaded config file: {}", path.display());
                file
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable config file: {}", e);
                FileConfig::default()
            }
        },
        None => FileConfig::default(),
    };

    let root_folder = cli_root
        .map(PathBuf::from)
        .or_else(|| file.root_folder.as_deref().map(PathBuf::from))
        .unwrap_or_else(default_root_folder);

    BoothConfig {
        root_folder,
        port: cli_port.or(file.port).unwrap_or(DEFAULT_PORT),
        enter_session_script: file
            .enter_session_script
            .unwrap_or_else(|| "toBooth.bat".to_string()),
        session_end_script: file
            .session_end_script
            .unwrap_or_else(|| "toWeb.bat".to_string()),
    }
}

/// Parse the TOML config file
fn read_config_file(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

/// Get default configuration file path for the platform
fn load_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("boothwall").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/boothwall/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("boothwall"))
        .unwrap_or_else(|| PathBuf::from("./boothwall_data"))
}

impl BoothConfig {
    /// Directory served at `/static`
    pub fn static_dir(&self) -> PathBuf {
        self.root_folder.join("static")
    }

    /// Parent directory of the per-slot display folders
    pub fn photos_dir(&self) -> PathBuf {
        self.static_dir().join("photos")
    }

    /// Public folder for one display slot
    pub fn slot_dir(&self, slot: u8) -> PathBuf {
        self.photos_dir().join(format!("Display{}", slot))
    }

    /// Directory holding the helper scripts
    pub fn scripts_dir(&self) -> PathBuf {
        self.root_folder.join("scripts")
    }

    /// Create the on-disk layout if missing (root, static/photos/DisplayN, scripts)
    pub fn ensure_layout(&self) -> Result<()> {
        for slot in 1..=3u8 {
            std::fs::create_dir_all(self.slot_dir(slot))?;
        }
        std::fs::create_dir_all(self.scripts_dir())?;
        Ok(())
    }
}
