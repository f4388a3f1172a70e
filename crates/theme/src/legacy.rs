//! `alacritty.toml` scanner.
//!
//! The file is read line by line rather than parsed as TOML: only section
//! headers and `key = color` lines matter, and themes in the wild are often
//! not valid TOML.

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeMap;

use crate::colors::{
    ColorSet, ACCENT_NAMES, DEFAULT_BACKGROUND, DEFAULT_FOREGROUND, LEGACY_DEFAULTS,
    MONOCHROME_STEPS,
};

/// Section the scanner is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// Outside any colors section
    None,
    /// `[colors.normal]`
    Normal,
    /// `[colors.bright]`
    Bright,
    /// Any other `[colors.*]` table
    Other,
}

impl Section {
    /// Classify a header line. Returns `None` for non-header lines.
    fn from_header(line: &str) -> Option<Section> {
        if line.starts_with("[colors.normal]") {
            Some(Section::Normal)
        } else if line.starts_with("[colors.bright]") {
            Some(Section::Bright)
        } else if line.starts_with('[') && !line.contains("colors") {
            Some(Section::None)
        } else if line.starts_with("[colors.") {
            Some(Section::Other)
        } else {
            None
        }
    }
}

/// Raw scan result before defaults are applied.
#[derive(Debug, Default)]
struct Scan {
    normal: BTreeMap<String, String>,
    bright: BTreeMap<String, String>,
    background: Option<String>,
}

impl Scan {
    /// Normal colors, with missing accents filled from the bright section.
    fn merged(&self) -> BTreeMap<String, String> {
        let mut colors = self.normal.clone();
        for name in ACCENT_NAMES {
            if !colors.contains_key(name) {
                if let Some(color) = self.bright.get(name) {
                    colors.insert(name.to_string(), color.clone());
                }
            }
        }
        colors
    }
}

fn scan(content: &str) -> Result<Scan> {
    // Exactly six hex digits, `#rrggbb` or `0xrrggbb`
    let hex = Regex::new(r"(?i)(?:#|0x)([0-9a-f]{6})\b").context("Failed to compile hex regex")?;

    let mut result = Scan::default();
    let mut section = Section::None;

    for line in content.lines().map(str::trim) {
        if let Some(next) = Section::from_header(line) {
            section = next;
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let Some(caps) = hex.captures(value) else {
            continue;
        };
        let key = key.trim();
        let color = format!("#{}", &caps[1]);

        if key.contains("background") {
            result.background = Some(color);
        } else if ACCENT_NAMES.iter().any(|name| key.contains(name)) {
            let name = key.rsplit_once('.').map_or(key, |(_, last)| last);
            match section {
                Section::Normal => {
                    result.normal.insert(name.to_string(), color);
                }
                Section::Bright => {
                    result.bright.insert(name.to_string(), color);
                }
                Section::None | Section::Other => {}
            }
        }
    }

    Ok(result)
}

/// Pull `foreground = "#rrggbb"` out of the raw text.
fn scrape_foreground(content: &str) -> Result<String> {
    let pattern = Regex::new(r#"foreground\s*=\s*"(?:#|0x)([a-fA-F0-9]{6})""#)
        .context("Failed to compile foreground regex")?;

    Ok(pattern
        .captures(content)
        .map(|caps| format!("#{}", &caps[1]))
        .unwrap_or_else(|| DEFAULT_FOREGROUND.to_string()))
}

/// Build a palette from an alacritty color file.
///
/// Themes without any accent colors get a gray gradient ending in the
/// theme foreground.
pub(crate) fn parse_legacy(content: &str) -> Result<ColorSet> {
    let scan = scan(content)?;
    let background = scan
        .background
        .clone()
        .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string());

    if !scan.normal.is_empty() && !scan.bright.is_empty() {
        log::debug!("Found both normal and bright colors, prioritizing normal colors");
    }

    let colors = scan.merged();
    if colors.is_empty() {
        let foreground = scrape_foreground(content)?;
        log::info!(
            "Theme has no color palette, using monochrome scheme with foreground: {}",
            foreground
        );
        let mut accents: Vec<String> = MONOCHROME_STEPS.iter().map(|s| s.to_string()).collect();
        accents.push(foreground);
        return Ok(ColorSet::new(accents, background));
    }

    Ok(ColorSet::from_lookup(
        |name| colors.get(name).map(String::as_str),
        &LEGACY_DEFAULTS,
        background,
    ))
}
