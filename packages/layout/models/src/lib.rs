#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Positioned text types shared by the layout and table crates.
//!
//! A PDF page arrives as a flat stream of [`RawFragment`]s. Normalization
//! turns each into a [`PositionedToken`], and line reconstruction clusters
//! tokens into [`Line`]s ordered left to right.

use serde::{Deserialize, Serialize};

/// A text fragment exactly as the PDF decoder reports it.
///
/// `transform` is the 2D affine text matrix `[a, b, c, d, e, f]`; the
/// horizontal and vertical offsets are its 5th and 6th components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFragment {
    /// String content, untrimmed.
    pub text: String,
    /// Affine transform of the fragment's first glyph.
    pub transform: [f64; 6],
}

impl RawFragment {
    /// Creates a fragment positioned at `(x, y)` with an identity scale.
    #[must_use]
    pub fn at(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            transform: [1.0, 0.0, 0.0, 1.0, x, y],
        }
    }

    /// Horizontal offset (5th transform component).
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.transform[4]
    }

    /// Vertical offset (6th transform component).
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.transform[5]
    }
}

/// A trimmed text fragment with its page position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedToken {
    /// Trimmed text. May be empty.
    pub text: String,
    /// Horizontal position in document units.
    pub x: f64,
    /// Vertical position in document units (PDF user space, grows upward).
    pub y: f64,
}

impl PositionedToken {
    /// Creates a token without trimming `text`.
    #[must_use]
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }

    /// Whether the token carries no visible text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A cluster of tokens judged to sit on the same printed row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Representative y: the y of the first token placed in this line.
    pub y: f64,
    /// Tokens sorted ascending by x.
    pub tokens: Vec<PositionedToken>,
}

impl Line {
    /// Space-joined token texts, left to right.
    #[must_use]
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_fragment_position_comes_from_transform_translation() {
        let fragment = RawFragment {
            text: " Alpha ".to_owned(),
            transform: [9.0, 0.0, 0.0, 9.0, 72.5, 640.25],
        };
        assert!((fragment.x() - 72.5).abs() < f64::EPSILON);
        assert!((fragment.y() - 640.25).abs() < f64::EPSILON);
    }

    #[test]
    fn line_text_joins_with_single_spaces_including_blanks() {
        let line = Line {
            y: 100.0,
            tokens: vec![
                PositionedToken::new("Fund name", 50.0, 100.0),
                PositionedToken::new("", 120.0, 100.0),
                PositionedToken::new("Units", 200.0, 100.0),
            ],
        };
        assert_eq!(line.text(), "Fund name  Units");
    }

    #[test]
    fn blank_token_detection() {
        assert!(PositionedToken::new("   ", 0.0, 0.0).is_blank());
        assert!(!PositionedToken::new("x", 0.0, 0.0).is_blank());
    }
}
