//! Tray configuration.
//!
//! Defaults are compiled in. An optional TOML file overrides them field by
//! field; the file is only ever read:
//! - Windows: `%APPDATA%/ollamaps/tray.toml`
//! - Linux: `~/.config/ollamaps/tray.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use ollamaps_status::{ColumnMap, DEFAULT_COMMAND, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};

/// Tray configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Shell command listing loaded models.
    #[serde(default = "default_command")]
    pub command: String,

    /// Seconds between refresh cycles.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Seconds before a status command run is abandoned.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Token indices for the name, memory and CPU columns.
    #[serde(default)]
    pub columns: ColumnMap,

    /// Preferred icon font; the platform default when unset.
    #[serde(default)]
    pub font_path: Option<PathBuf>,

    /// Maximum characters shown in the models popup.
    #[serde(default = "default_popup_limit")]
    pub popup_limit: usize,
}

fn default_command() -> String {
    DEFAULT_COMMAND.into()
}

fn default_interval() -> u64 {
    1
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_popup_limit() -> usize {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command: default_command(),
            interval_secs: default_interval(),
            timeout_secs: default_timeout(),
            columns: ColumnMap::default(),
            font_path: None,
            popup_limit: default_popup_limit(),
        }
    }
}

impl Config {
    /// Loads configuration from disk.
    ///
    /// Falls back to the defaults when the file is missing or unreadable.
    pub fn load() -> Self {
        Self::load_or_default(&config_path())
    }

    fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), "invalid config, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Loads configuration from a specific TOML file.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Refresh interval, at least one second.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    /// Status command timeout, at least one second.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("ollamaps").join("tray.toml")
    }

    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("ollamaps")
            .join("tray.toml")
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        PathBuf::from("/tmp/ollamaps/tray.toml")
    }
}
