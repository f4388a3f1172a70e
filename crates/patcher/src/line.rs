//! Line classification for cava's `key = value` format.

/// What a config line means to the patcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineKind {
    /// `[name]`
    Header(String),
    /// `gradient = ...`
    GradientMode,
    /// `gradient_color_N = ...`
    GradientColor(usize),
    /// `background = ...`
    Background,
    /// Anything else, including comments and blank lines
    Other,
}

impl LineKind {
    fn classify(text: &str) -> LineKind {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
            return LineKind::Other;
        }

        if let Some(name) = trimmed.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            return LineKind::Header(name.trim().to_string());
        }

        let Some((key, _)) = trimmed.split_once('=') else {
            return LineKind::Other;
        };

        match key.trim() {
            "gradient" => LineKind::GradientMode,
            "background" => LineKind::Background,
            key => key
                .strip_prefix("gradient_color_")
                .and_then(|n| n.parse::<usize>().ok())
                .map_or(LineKind::Other, LineKind::GradientColor),
        }
    }
}

/// One line of the config, without its `\n`.
#[derive(Debug, Clone)]
pub(crate) struct Line {
    pub text: String,
    pub kind: LineKind,
}

impl Line {
    pub fn parse(text: &str) -> Self {
        Self {
            text: text.to_string(),
            kind: LineKind::classify(text),
        }
    }

    fn indent(&self) -> &str {
        let body = self.text.trim_start();
        &self.text[..self.text.len() - body.len()]
    }

    /// Trailing `\r` of a CRLF file, if any.
    fn line_end(&self) -> &str {
        if self.text.ends_with('\r') {
            "\r"
        } else {
            ""
        }
    }

    /// Text after the first `=`, trimmed.
    pub fn value(&self) -> Option<&str> {
        self.text.split_once('=').map(|(_, value)| value.trim())
    }

    /// Replace the line body, keeping indentation and line ending.
    pub fn rewrite(&mut self, body: &str) {
        self.text = format!("{}{}{}", self.indent(), body, self.line_end());
        self.kind = LineKind::classify(&self.text);
    }

    /// A new line formatted like this one.
    pub fn sibling(&self, body: &str) -> Line {
        Line::parse(&format!("{}{}{}", self.indent(), body, self.line_end()))
    }
}

/// If `value` starts with a quoted or bare `#rrggbb`, return what follows it.
pub(crate) fn strip_literal_color(value: &str) -> Option<&str> {
    let rest = value.strip_prefix(['\'', '"']).unwrap_or(value);
    let rest = rest.strip_prefix('#')?;
    let digits = rest.get(..6)?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let rest = &rest[6..];
    if rest.starts_with(|c: char| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(rest.strip_prefix(['\'', '"']).unwrap_or(rest))
}
