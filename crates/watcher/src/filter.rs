//! Event relevance and trigger throttling.

use notify::event::CreateKind;
use notify::{Event, EventKind};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Active theme symlink, relative to the theme root.
pub const ACTIVE_THEME_SUFFIX: &str = "current/theme";

/// Path fragment marking the active theme tree.
pub const ACTIVE_MARKER: &str = "current";

/// Decides which filesystem events can mean "the theme changed".
#[derive(Debug, Clone)]
pub struct TriggerFilter {
    /// Watched root; the marker is matched below it only
    root: PathBuf,
}

impl TriggerFilter {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Creation or modification of a non-directory path that ends with the
    /// active theme link or mentions the marker.
    pub fn is_relevant(&self, event: &Event) -> bool {
        match event.kind {
            EventKind::Create(CreateKind::Folder) => false,
            EventKind::Create(_) | EventKind::Modify(_) => event
                .paths
                .iter()
                .any(|path| !is_real_directory(path) && self.matches_path(path)),
            _ => false,
        }
    }

    pub fn matches_path(&self, path: &Path) -> bool {
        if path.ends_with(ACTIVE_THEME_SUFFIX) {
            return true;
        }
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative.to_string_lossy().contains(ACTIVE_MARKER)
    }
}

/// A directory that is not reached through a symlink.
fn is_real_directory(path: &Path) -> bool {
    std::fs::symlink_metadata(path)
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

/// Throttles update triggers to one per interval.
#[derive(Debug)]
pub struct UpdateThrottler {
    /// Minimum interval between accepted triggers
    interval: Duration,
    /// Last accepted trigger
    last_trigger: Option<Instant>,
}

impl UpdateThrottler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_trigger: None,
        }
    }

    /// Accept the trigger at `now` unless one was accepted within the interval.
    pub fn should_update(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_trigger {
            if now.saturating_duration_since(last) < self.interval {
                return false;
            }
        }

        self.last_trigger = Some(now);
        true
    }
}
