//! Configuration structures for cavasync settings.

use serde::Deserialize;

use crate::defaults;

/// Application configuration with nested sections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Filesystem locations
    #[serde(default)]
    pub paths: PathSettings,

    /// Theme watcher settings
    #[serde(default)]
    pub watcher: WatcherSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Filesystem locations. Unset entries fall back to the conventional paths.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathSettings {
    /// Omarchy configuration root (contains `current/theme`)
    #[serde(default)]
    pub theme_root: Option<String>,

    /// Cava configuration file
    #[serde(default)]
    pub cava_config: Option<String>,
}

/// Theme watcher settings.
#[derive(Debug, Clone, Deserialize)]
pub struct WatcherSettings {
    /// Minimum time between accepted update triggers
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Wall-clock limit for one update subprocess
    #[serde(default = "default_update_timeout_secs")]
    pub update_timeout_secs: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Log file path (optional)
    #[serde(default)]
    pub file_path: Option<String>,

    /// Minimum log level (debug, info, warn, error)
    #[serde(default = "default_min_level")]
    pub min_level: String,
}

// Default value functions for serde
fn default_debounce_ms() -> u64 {
    defaults::DEBOUNCE_MS
}

fn default_update_timeout_secs() -> u64 {
    defaults::UPDATE_TIMEOUT_SECS
}

fn default_min_level() -> String {
    defaults::MIN_LOG_LEVEL.to_string()
}

// Default implementations
impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            update_timeout_secs: default_update_timeout_secs(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file_path: None,
            min_level: default_min_level(),
        }
    }
}
