//! Configuration management for cavasync.
//!
//! This crate provides configuration loading and path resolution
//! with support for TOML format and XDG directory conventions.

mod settings;
mod xdg;

pub use settings::{Config, LoggingSettings, PathSettings, WatcherSettings};
pub use xdg::{expand_home, get_config_dir, get_user_config_root};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default values as constants
pub mod defaults {
    pub const DEBOUNCE_MS: u64 = 1000;
    pub const UPDATE_TIMEOUT_SECS: u64 = 10;
    pub const MIN_LOG_LEVEL: &str = "info";

    /// Omarchy directory under `~/.config`
    pub const THEME_ROOT_DIR: &str = "omarchy";
    /// Active theme symlink, relative to the theme root
    pub const ACTIVE_THEME_LINK: &str = "current/theme";
    /// Cava configuration file, relative to `~/.config`
    pub const CAVA_CONFIG: &str = "cava/config";
    /// Watcher log file, relative to `~/.config`
    pub const LOG_FILE: &str = "cava/theme-monitor.log";
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// A missing file yields the default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::validate_content(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Get path to config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(get_config_dir()?.join("config.toml"))
    }

    /// Validate config content.
    pub fn validate_content(content: &str) -> Result<Config> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("{}", e))
    }

    /// Omarchy root directory that is watched for theme switches.
    pub fn theme_root(&self) -> Result<PathBuf> {
        match &self.paths.theme_root {
            Some(path) => Ok(expand_home(path)),
            None => Ok(get_user_config_root()?.join(defaults::THEME_ROOT_DIR)),
        }
    }

    /// Cava configuration file that gets patched.
    pub fn cava_config(&self) -> Result<PathBuf> {
        match &self.paths.cava_config {
            Some(path) => Ok(expand_home(path)),
            None => Ok(get_user_config_root()?.join(defaults::CAVA_CONFIG)),
        }
    }

    /// Log file used by the watcher.
    pub fn log_file(&self) -> Result<PathBuf> {
        match &self.logging.file_path {
            Some(path) => Ok(expand_home(path)),
            None => Ok(get_user_config_root()?.join(defaults::LOG_FILE)),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.watcher.debounce_ms)
    }

    pub fn update_timeout(&self) -> Duration {
        Duration::from_secs(self.watcher.update_timeout_secs)
    }
}

/// Path of the active theme symlink below a theme root.
pub fn active_theme_link(theme_root: &Path) -> PathBuf {
    theme_root.join(defaults::ACTIVE_THEME_LINK)
}
