//! Phrase rule evaluation against a line's text.

use std::borrow::Cow;

use holdings_extract_table_models::{MatchMode, MatchRule};

/// Whether `line_text` satisfies `rule`.
///
/// With `case_sensitive` off, both the text and the phrases are lowercased
/// first. With `enforce_order` on, every phrase must occur at or after the
/// end of the previous phrase's match, regardless of `rule.rule`.
/// Otherwise [`MatchMode::All`] requires every phrase as a substring and
/// [`MatchMode::Any`] requires at least one.
#[must_use]
pub fn is_match(line_text: &str, rule: &MatchRule) -> bool {
    let text: Cow<'_, str> = if rule.case_sensitive {
        Cow::Borrowed(line_text)
    } else {
        Cow::Owned(line_text.to_lowercase())
    };
    let phrases: Vec<Cow<'_, str>> = rule
        .phrases
        .iter()
        .map(|p| {
            if rule.case_sensitive {
                Cow::Borrowed(p.as_str())
            } else {
                Cow::Owned(p.to_lowercase())
            }
        })
        .collect();

    if rule.enforce_order {
        let mut from = 0;
        for phrase in &phrases {
            match text[from..].find(phrase.as_ref()) {
                Some(idx) => from += idx + phrase.len(),
                None => return false,
            }
        }
        return true;
    }

    match rule.rule {
        MatchMode::All => phrases.iter().all(|p| text.contains(p.as_ref())),
        MatchMode::Any => phrases.iter().any(|p| text.contains(p.as_ref())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(phrases: &[&str], mode: MatchMode) -> MatchRule {
        MatchRule::new(phrases.iter().copied(), mode)
    }

    #[test]
    fn any_matches_when_one_phrase_present() {
        let stop = rule(&["Total", "No assets"], MatchMode::Any);
        assert!(is_match("Total portfolio value", &stop));
        assert!(is_match("no assets held", &stop));
        assert!(!is_match("Alpha Fund", &stop));
    }

    #[test]
    fn all_requires_every_phrase_in_any_order() {
        let forward = rule(&["Security", "Free"], MatchMode::All);
        let reversed = rule(&["Free", "Security"], MatchMode::All);

        for text in ["Security Name Free Balance", "Free Balance Security Name"] {
            assert!(is_match(text, &forward));
            assert!(is_match(text, &reversed));
        }
        assert!(!is_match("Security Name Pledged", &forward));
    }

    #[test]
    fn case_insensitive_folds_both_sides() {
        let r = rule(&["FUND NAME"], MatchMode::Any);
        assert!(is_match("Fund name Units", &r));
    }

    #[test]
    fn case_sensitive_respects_case() {
        let r = rule(&["Fund name"], MatchMode::Any).with_case_sensitive(true);
        assert!(is_match("Fund name Units", &r));
        assert!(!is_match("FUND NAME UNITS", &r));
    }

    #[test]
    fn enforced_order_flips_when_phrases_reversed() {
        let text = "Fund name Asset class Units";
        let in_order = rule(&["Fund name", "Units"], MatchMode::All).with_enforce_order(true);
        let reversed = rule(&["Units", "Fund name"], MatchMode::All).with_enforce_order(true);

        assert!(is_match(text, &in_order));
        assert!(!is_match(text, &reversed));
    }

    #[test]
    fn enforced_order_ignores_any_mode() {
        let r = rule(&["Fund name", "Units"], MatchMode::Any).with_enforce_order(true);
        assert!(!is_match("Fund name only", &r));
    }

    #[test]
    fn enforced_order_does_not_allow_overlapping_matches() {
        let r = rule(&["abc", "cde"], MatchMode::All).with_enforce_order(true);
        assert!(!is_match("abcde", &r));
        assert!(is_match("abc cde", &r));
    }

    #[test]
    fn enforced_order_allows_repeated_phrase_only_when_repeated_in_text() {
        let r = rule(&["Total", "Total"], MatchMode::All).with_enforce_order(true);
        assert!(!is_match("Total", &r));
        assert!(is_match("Total Subtotal Total", &r));
    }

    #[test]
    fn empty_phrase_lists() {
        assert!(is_match("anything", &rule(&[], MatchMode::All)));
        assert!(!is_match("anything", &rule(&[], MatchMode::Any)));
        assert!(is_match(
            "anything",
            &rule(&[], MatchMode::Any).with_enforce_order(true)
        ));
    }
}
