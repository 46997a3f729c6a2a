//! Client settings persistence
//!
//! [`ClientSettings`] is stored as pretty JSON in `settings.json` inside
//! the platform configuration directory, e.g.
//! `~/.config/partychess/settings.json` on Linux.
//!
//! Load failures fall back to defaults and are only logged; a broken
//! settings file never keeps the client from starting.

use super::error::{CoreError, CoreResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:8080/game";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// WebSocket endpoint of the lobby server
    pub server_url: String,
    /// `tracing` filter directive, overridden by `RUST_LOG`
    pub log_filter: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ClientSettings {
    /// Path of `settings.json` in the user's configuration directory
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("com", "partychess", "partychess")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILENAME))
    }

    /// Load from the configuration directory, or defaults
    pub fn load() -> Self {
        match Self::path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                warn!(
                    "[SETTINGS] Failed to load settings at {:?}: {}. Using defaults.",
                    path, e
                );
                Self::default()
            }),
            Some(path) => {
                info!("[SETTINGS] No settings file at {:?}. Using defaults.", path);
                Self::default()
            }
            None => {
                warn!("[SETTINGS] No configuration directory. Using defaults.");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> CoreResult<Self> {
        let contents = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        info!("[SETTINGS] Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save to the configuration directory, returning the path written
    pub fn save(&self) -> CoreResult<PathBuf> {
        let path = Self::path().ok_or(CoreError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("[SETTINGS] Saved settings to {:?}", path);
        Ok(())
    }
}
