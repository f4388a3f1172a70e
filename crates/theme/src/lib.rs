//! Theme color extraction for cavasync.
//!
//! Resolves the active Omarchy theme and pulls a cava palette out of
//! whichever color source the theme ships.

mod colors;
mod legacy;
mod loader;
mod structured;

pub use colors::{ColorSet, ACCENT_NAMES, DEFAULT_BACKGROUND, DEFAULT_FOREGROUND};
pub use loader::{extract, ColorSource, LEGACY_FILE, STRUCTURED_FILE};

use std::path::{Path, PathBuf};

/// Resolve the active theme directory from the `current/theme` symlink.
///
/// Returns `None` when the link is missing, is not a symlink, or points at
/// something that is not a directory. Relative targets are resolved against
/// the link's own directory.
pub fn resolve_active_theme(link: &Path) -> Option<PathBuf> {
    let metadata = std::fs::symlink_metadata(link).ok()?;
    if !metadata.file_type().is_symlink() {
        return None;
    }

    let target = std::fs::read_link(link).ok()?;
    let target = if target.is_relative() {
        link.parent()?.join(target)
    } else {
        target
    };

    target.is_dir().then_some(target)
}

/// Display name of a theme directory.
pub fn theme_name(theme_dir: &Path) -> String {
    theme_dir
        .file_name()
        .and_then(|n| n.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| theme_dir.display().to_string())
}
