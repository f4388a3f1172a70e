//! In-place gradient rewriting for cava configuration files.
//!
//! The patcher only touches `gradient`, `gradient_color_N` and literal
//! `background` directives. Every other line, including comments and
//! commented-out directives, is kept byte for byte in its original position.

mod line;
mod patch;

pub use patch::{clean_color, patch, PatchReport};

/// Cava accepts at most eight gradient colors.
pub const MAX_GRADIENT_COLORS: usize = 8;

/// Per-color patch errors. The offending color is skipped, others still apply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    #[error("Invalid color format '{value}' for gradient_color_{index}, skipping")]
    InvalidColor { index: usize, value: String },
}
