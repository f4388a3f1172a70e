//! Color source discovery and fallback.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::colors::ColorSet;
use crate::legacy::parse_legacy;
use crate::structured::parse_structured;

/// Structured theme description shipped by Omarchy theme generators.
pub const STRUCTURED_FILE: &str = "custom_theme.json";

/// Alacritty color file present in most Omarchy themes.
pub const LEGACY_FILE: &str = "alacritty.toml";

/// A color source found inside a theme directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSource {
    /// `custom_theme.json`
    StructuredDocument(PathBuf),
    /// `alacritty.toml`
    LegacyToml(PathBuf),
}

impl ColorSource {
    /// Sources present in `theme_dir`, highest priority first.
    pub fn discover(theme_dir: &Path) -> Vec<ColorSource> {
        let mut sources = Vec::new();

        let structured = theme_dir.join(STRUCTURED_FILE);
        if structured.is_file() {
            sources.push(ColorSource::StructuredDocument(structured));
        }

        let legacy = theme_dir.join(LEGACY_FILE);
        if legacy.is_file() {
            sources.push(ColorSource::LegacyToml(legacy));
        }

        sources
    }

    pub fn path(&self) -> &Path {
        match self {
            ColorSource::StructuredDocument(path) | ColorSource::LegacyToml(path) => path,
        }
    }

    /// Read colors from this source.
    ///
    /// `Ok(None)` means the file parsed but carried nothing usable.
    pub fn read_colors(&self) -> Result<Option<ColorSet>> {
        let path = self.path();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        match self {
            ColorSource::StructuredDocument(_) => parse_structured(&content),
            ColorSource::LegacyToml(_) => parse_legacy(&content).map(Some),
        }
    }
}

/// Extract a palette from a theme directory.
///
/// Sources are tried in priority order; a source that fails to parse is
/// logged and skipped. Returns `None` when no source yields colors.
pub fn extract(theme_dir: &Path) -> Option<ColorSet> {
    for source in ColorSource::discover(theme_dir) {
        match source.read_colors() {
            Ok(Some(colors)) => {
                log::debug!("Using colors from {}", source.path().display());
                return Some(colors);
            }
            Ok(None) => {
                log::warn!("No usable colors in {}", source.path().display());
            }
            Err(e) => {
                log::warn!("Error reading theme colors: {:#}", e);
            }
        }
    }
    None
}
