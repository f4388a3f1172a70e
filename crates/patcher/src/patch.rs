//! Gradient rewrite over classified lines.

use cavasync_theme::ColorSet;

use crate::line::{strip_literal_color, Line, LineKind};
use crate::{PatchError, MAX_GRADIENT_COLORS};

const GRADIENT_ON: &str = "gradient = 1";
const BACKGROUND_DEFAULT: &str = "background = default";
const COLOR_SECTION: &str = "color";

/// Outcome of patching a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    /// Patched config text
    pub text: String,
    /// `(index, color)` pairs written, 1-based
    pub applied: Vec<(usize, String)>,
    /// Colors that failed validation and were skipped
    pub rejected: Vec<PatchError>,
}

/// Reduce a candidate to `#rrggbb`, dropping trailing text after whitespace.
///
/// Returns `None` unless the first token is `#` followed by exactly six hex
/// digits.
pub fn clean_color(candidate: &str) -> Option<&str> {
    let token = candidate.split_whitespace().next()?;
    let digits = token.strip_prefix('#')?;
    (digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit())).then_some(token)
}

/// Rewrite the gradient directives of a cava config.
///
/// Applying the same colors twice yields the same text as applying them once.
pub fn patch(config: &str, colors: &ColorSet) -> PatchReport {
    let mut lines: Vec<Line> = config.split('\n').map(Line::parse).collect();
    let accents = &colors.accents[..colors.accents.len().min(MAX_GRADIENT_COLORS)];

    enable_gradient(&mut lines);
    reset_background(&mut lines);

    let mut applied = Vec::new();
    let mut rejected = Vec::new();
    for (offset, candidate) in accents.iter().enumerate() {
        let index = offset + 1;
        match clean_color(candidate) {
            Some(color) => {
                set_gradient_color(&mut lines, index, color);
                applied.push((index, color.to_string()));
            }
            None => rejected.push(PatchError::InvalidColor {
                index,
                value: candidate.clone(),
            }),
        }
    }

    // Stale entries from a previous, larger palette
    lines.retain(|line| !matches!(line.kind, LineKind::GradientColor(i) if i > accents.len()));

    let text = lines
        .iter()
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    PatchReport {
        text,
        applied,
        rejected,
    }
}

/// Force every `gradient` directive to 1, adding one if the config has none.
fn enable_gradient(lines: &mut Vec<Line>) {
    let mut found = false;
    for line in lines.iter_mut().filter(|l| l.kind == LineKind::GradientMode) {
        line.rewrite(GRADIENT_ON);
        found = true;
    }
    if found {
        return;
    }

    let header = lines
        .iter()
        .position(|l| l.kind == LineKind::Header(COLOR_SECTION.to_string()));
    if let Some(at) = header {
        let line = lines[at].sibling(GRADIENT_ON);
        lines.insert(at + 1, line);
        return;
    }

    // No [color] section: append one, before the final newline
    let mut at = lines.len();
    if lines.last().is_some_and(|l| l.text.is_empty()) {
        at -= 1;
    }
    let mut section = Vec::new();
    if at > 0 && !lines[at - 1].text.trim().is_empty() {
        section.push(Line::parse(""));
    }
    section.push(Line::parse(&format!("[{}]", COLOR_SECTION)));
    section.push(Line::parse(GRADIENT_ON));
    lines.splice(at..at, section);
}

/// Replace literal `background = '#rrggbb'` values with `default`.
fn reset_background(lines: &mut [Line]) {
    for line in lines.iter_mut().filter(|l| l.kind == LineKind::Background) {
        let rest = line.value().and_then(strip_literal_color).map(str::to_string);
        if let Some(rest) = rest {
            line.rewrite(&format!("{}{}", BACKGROUND_DEFAULT, rest));
        }
    }
}

/// Replace `gradient_color_{index}` in place, or insert it after the highest
/// existing gradient color (or the gradient directive when there is none).
fn set_gradient_color(lines: &mut Vec<Line>, index: usize, color: &str) {
    let body = format!("gradient_color_{} = '{}'", index, color);

    let mut found = false;
    for line in lines
        .iter_mut()
        .filter(|l| l.kind == LineKind::GradientColor(index))
    {
        line.rewrite(&body);
        found = true;
    }
    if found {
        return;
    }

    let anchor = (1..=MAX_GRADIENT_COLORS)
        .rev()
        .find_map(|i| {
            lines
                .iter()
                .position(|l| l.kind == LineKind::GradientColor(i))
        })
        .or_else(|| lines.iter().position(|l| l.kind == LineKind::GradientMode));

    match anchor {
        Some(at) => {
            let line = lines[at].sibling(&body);
            lines.insert(at + 1, line);
        }
        // enable_gradient always leaves a gradient directive behind
        None => lines.push(Line::parse(&body)),
    }
}
