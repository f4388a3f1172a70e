//! Omarchy theme watcher for cavasync.
//!
//! Observes the Omarchy config tree with notify and re-runs the cava update
//! in a child process whenever the active theme changes.

mod filter;
mod runner;
mod watcher;

pub use filter::{TriggerFilter, UpdateThrottler, ACTIVE_MARKER, ACTIVE_THEME_SUFFIX};
pub use runner::{RunOutcome, SubprocessRunner, UpdateRunner};
pub use watcher::{create_watcher, watch, ThemeWatcher, WatcherState};

use std::path::PathBuf;

/// Watcher setup failures. Update failures are never reported here.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("Omarchy config directory not found: {}", .0.display())]
    ThemeRootMissing(PathBuf),

    #[error("Update command not found: {}", .0.display())]
    UpdaterMissing(PathBuf),

    #[error("Failed to watch theme directory: {0}")]
    Notify(#[from] notify::Error),

    #[error("Failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),
}
