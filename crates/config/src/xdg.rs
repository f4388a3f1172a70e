//! XDG Base Directory support for cavasync.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "cavasync";

/// Get the configuration directory following XDG conventions.
///
/// Returns `$XDG_CONFIG_HOME/cavasync` or `~/.config/cavasync`.
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(APP_NAME))
        .context("Failed to determine config directory")
}

/// Get the user's base configuration directory (`~/.config`).
///
/// Omarchy and cava keep their files here, independent of cavasync's own
/// directory.
pub fn get_user_config_root() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|p| p.join(".config"))
        .context("Failed to determine home directory")
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    Path::new(path).to_path_buf()
}
