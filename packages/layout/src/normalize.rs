//! Raw fragment normalization.

use holdings_extract_layout_models::{PositionedToken, RawFragment};

/// Converts one decoder fragment into a positioned token.
///
/// The text is trimmed of surrounding whitespace. Fragments that trim to
/// nothing are kept as empty tokens because they still take part in line
/// membership.
#[must_use]
pub fn normalize(fragment: &RawFragment) -> PositionedToken {
    PositionedToken {
        text: fragment.text.trim().to_owned(),
        x: fragment.x(),
        y: fragment.y(),
    }
}

/// Normalizes a page of fragments, preserving decoder order.
#[must_use]
pub fn normalize_page(fragments: &[RawFragment]) -> Vec<PositionedToken> {
    fragments.iter().map(normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_text_and_reads_translation_components() {
        let fragment = RawFragment {
            text: "  Beta Fund \t".to_owned(),
            transform: [8.0, 0.0, 0.0, 8.0, 50.0, 612.0],
        };

        let token = normalize(&fragment);

        assert_eq!(token, PositionedToken::new("Beta Fund", 50.0, 612.0));
    }

    #[test]
    fn keeps_whitespace_only_fragments_as_empty_tokens() {
        let tokens = normalize_page(&[
            RawFragment::at("A", 10.0, 10.0),
            RawFragment::at("   ", 20.0, 10.0),
        ]);

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text, "");
    }
}
