//! Palette definitions.

/// Accent names in palette order.
///
/// The order is positional: consumers map index `i` to `gradient_color_{i+1}`.
pub const ACCENT_NAMES: [&str; 6] = ["cyan", "blue", "magenta", "yellow", "red", "green"];

/// Background used when a theme does not define one.
pub const DEFAULT_BACKGROUND: &str = "#333333";

/// Foreground used by the monochrome fallback when the theme has none.
pub const DEFAULT_FOREGROUND: &str = "#EFEFEF";

/// Accent defaults for `custom_theme.json`, in `ACCENT_NAMES` order.
pub(crate) const STRUCTURED_DEFAULTS: [&str; 6] = [
    "#048ba8", "#38d6fa", "#d35f5f", "#9f87af", "#9c528b", "#a9fbd7",
];

/// Accent defaults for `alacritty.toml`, in `ACCENT_NAMES` order.
pub(crate) const LEGACY_DEFAULTS: [&str; 6] = [
    "#8be9fd", "#bd93f9", "#ff79c6", "#f1fa8c", "#ff5555", "#50fa7b",
];

/// Dark-to-light gray steps for themes without a palette.
pub(crate) const MONOCHROME_STEPS: [&str; 5] =
    ["#333333", "#555555", "#777777", "#999999", "#BBBBBB"];

/// Colors extracted from a theme.
///
/// Values are kept as the theme wrote them; validation happens when they are
/// written into the cava config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSet {
    /// Up to six accent colors in `ACCENT_NAMES` order
    pub accents: Vec<String>,
    /// Theme background
    pub background: String,
}

impl ColorSet {
    pub fn new(accents: Vec<String>, background: impl Into<String>) -> Self {
        Self {
            accents,
            background: background.into(),
        }
    }

    /// Build a set by looking up each accent name, falling back to `defaults`.
    pub(crate) fn from_lookup<'a>(
        lookup: impl Fn(&str) -> Option<&'a str>,
        defaults: &[&str; 6],
        background: impl Into<String>,
    ) -> Self {
        let accents = ACCENT_NAMES
            .iter()
            .zip(defaults.iter())
            .map(|(&name, &default)| lookup(name).unwrap_or(default).to_string())
            .collect();
        Self::new(accents, background)
    }
}
