//! `custom_theme.json` reader.
//!
//! Only the fields cava needs are modelled; everything else is ignored.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::colors::{ColorSet, DEFAULT_BACKGROUND, STRUCTURED_DEFAULTS};

type ColorTable = Map<String, Value>;

#[derive(Debug, Default, Deserialize)]
struct ThemeDocument {
    #[serde(default)]
    colors: DocumentColors,
    #[serde(default)]
    apps: Apps,
}

#[derive(Debug, Default, Deserialize)]
struct DocumentColors {
    terminal: Option<ColorTable>,
    primary: Option<ColorTable>,
}

#[derive(Debug, Default, Deserialize)]
struct Apps {
    alacritty: Option<AlacrittyApp>,
}

#[derive(Debug, Default, Deserialize)]
struct AlacrittyApp {
    #[serde(default)]
    colors: AlacrittyColors,
}

#[derive(Debug, Default, Deserialize)]
struct AlacrittyColors {
    normal: Option<ColorTable>,
    primary: Option<ColorTable>,
}

fn lookup<'a>(table: &'a ColorTable, name: &str) -> Option<&'a str> {
    table.get(name).and_then(Value::as_str)
}

/// Parse a structured theme document.
///
/// Returns `Ok(None)` when the document has neither a terminal section nor
/// an alacritty normal section.
pub(crate) fn parse_structured(content: &str) -> Result<Option<ColorSet>> {
    let doc: ThemeDocument = serde_json::from_str(content).context("Invalid JSON theme")?;

    let alacritty = doc.apps.alacritty.as_ref().map(|app| &app.colors);

    // Terminal colors win over the alacritty palette
    let Some(section) = doc
        .colors
        .terminal
        .as_ref()
        .or_else(|| alacritty.and_then(|c| c.normal.as_ref()))
    else {
        return Ok(None);
    };

    let background = doc
        .colors
        .primary
        .as_ref()
        .and_then(|primary| lookup(primary, "background"))
        .or_else(|| {
            alacritty
                .and_then(|c| c.primary.as_ref())
                .and_then(|primary| lookup(primary, "background"))
        })
        .unwrap_or(DEFAULT_BACKGROUND);

    Ok(Some(ColorSet::from_lookup(
        |name| lookup(section, name),
        &STRUCTURED_DEFAULTS,
        background,
    )))
}
