//! Wrap merging and y-proximity line clustering.
//!
//! The two steps use different position policies. A wrapped
//! cell is drawn by a single rendering pass, so its fragments share a
//! bit-identical x ([`WRAP_MERGE_EXACT`]). Tokens on one printed row only
//! agree on y up to renderer rounding ([`LINE_CLUSTER_TOLERANCE`]).

use holdings_extract_layout_models::{Line, PositionedToken};

/// Maximum x difference for two fragments to be treated as one wrapped
/// cell. Zero: the positions must be equal.
pub const WRAP_MERGE_EXACT: f64 = 0.0;

/// Tokens whose y lies strictly within this distance of a line's
/// representative y belong to that line.
pub const LINE_CLUSTER_TOLERANCE: f64 = 5.0;

/// Rejoins cell text that wrapped onto additional printed lines.
///
/// Walks tokens in decoder order, tracking the last non-empty token that
/// started a new entry. A non-empty token at exactly that token's x is
/// appended to it (space-joined) and dropped. Empty tokens pass through
/// untouched and never become the merge target, so they do not break a
/// wrap chain either.
#[must_use]
pub fn merge_wrapped(tokens: Vec<PositionedToken>) -> Vec<PositionedToken> {
    let mut merged: Vec<PositionedToken> = Vec::with_capacity(tokens.len());
    let mut previous: Option<usize> = None;

    for token in tokens {
        if token.is_blank() {
            merged.push(token);
            continue;
        }

        if let Some(idx) = previous
            && (merged[idx].x - token.x).abs() <= WRAP_MERGE_EXACT
        {
            let target = &mut merged[idx];
            target.text.push(' ');
            target.text.push_str(&token.text);
            continue;
        }

        previous = Some(merged.len());
        merged.push(token);
    }

    merged
}

/// Buckets tokens into lines by y proximity and sorts each line by x.
///
/// Each token joins the first existing line whose representative y is
/// within [`LINE_CLUSTER_TOLERANCE`]; otherwise it opens a new line with
/// its own y as representative. Lines are returned in creation order.
#[must_use]
pub fn cluster_lines(tokens: Vec<PositionedToken>) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();

    for token in tokens {
        match lines
            .iter_mut()
            .find(|line| (line.y - token.y).abs() < LINE_CLUSTER_TOLERANCE)
        {
            Some(line) => line.tokens.push(token),
            None => lines.push(Line {
                y: token.y,
                tokens: vec![token],
            }),
        }
    }

    for line in &mut lines {
        line.tokens.sort_by(|a, b| a.x.total_cmp(&b.x));
    }

    lines
}

/// Reorders lines top to bottom (descending y in PDF user space).
///
/// Only needed when the decoder does not emit fragments in reading order.
/// Lines at equal y keep their relative order.
pub fn sort_top_to_bottom(lines: &mut [Line]) {
    lines.sort_by(|a, b| b.y.total_cmp(&a.y));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, x: f64, y: f64) -> PositionedToken {
        PositionedToken::new(text, x, y)
    }

    #[test]
    fn merges_same_x_fragments_in_input_order() {
        let merged = merge_wrapped(vec![
            token("Global Equity", 50.0, 500.0),
            token("Fund", 50.0, 490.0),
        ]);

        assert_eq!(merged, vec![token("Global Equity Fund", 50.0, 500.0)]);
    }

    #[test]
    fn merges_three_fragment_wrap_into_first() {
        let merged = merge_wrapped(vec![
            token("A", 50.0, 500.0),
            token("B", 50.0, 490.0),
            token("C", 50.0, 480.0),
        ]);

        assert_eq!(merged, vec![token("A B C", 50.0, 500.0)]);
    }

    #[test]
    fn does_not_merge_nearby_but_unequal_x() {
        let merged = merge_wrapped(vec![token("A", 50.0, 500.0), token("B", 50.001, 490.0)]);

        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn empty_token_passes_through_without_breaking_wrap_chain() {
        let merged = merge_wrapped(vec![
            token("A", 50.0, 500.0),
            token("", 50.0, 495.0),
            token("B", 50.0, 490.0),
        ]);

        assert_eq!(
            merged,
            vec![token("A B", 50.0, 500.0), token("", 50.0, 495.0)]
        );
    }

    #[test]
    fn empty_token_is_never_a_merge_target() {
        let merged = merge_wrapped(vec![token("", 50.0, 500.0), token("B", 50.0, 490.0)]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].text, "B");
    }

    #[test]
    fn merge_target_is_last_new_token_not_earlier_ones() {
        let merged = merge_wrapped(vec![
            token("Fund name", 50.0, 700.0),
            token("Units", 300.0, 700.0),
            token("Alpha", 50.0, 680.0),
        ]);

        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn y_difference_under_tolerance_shares_a_line() {
        let lines = cluster_lines(vec![token("a", 10.0, 100.0), token("b", 20.0, 104.9)]);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].tokens.len(), 2);
    }

    #[test]
    fn y_difference_over_tolerance_splits_lines() {
        let lines = cluster_lines(vec![token("a", 10.0, 100.0), token("b", 20.0, 105.1)]);

        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn representative_y_is_first_token_and_does_not_drift() {
        let lines = cluster_lines(vec![
            token("a", 10.0, 100.0),
            token("b", 20.0, 104.0),
            token("c", 30.0, 108.0),
        ]);

        assert_eq!(lines.len(), 2);
        assert!((lines[0].y - 100.0).abs() < f64::EPSILON);
        assert!((lines[1].y - 108.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tokens_sorted_by_x_within_line() {
        let lines = cluster_lines(vec![
            token("right", 300.0, 100.0),
            token("left", 50.0, 101.0),
            token("middle", 150.0, 99.0),
        ]);

        let texts: Vec<&str> = lines[0].tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["left", "middle", "right"]);
    }

    #[test]
    fn lines_keep_first_encountered_order() {
        let lines = cluster_lines(vec![token("low", 10.0, 100.0), token("high", 10.0, 700.0)]);

        assert_eq!(lines[0].text(), "low");
        assert_eq!(lines[1].text(), "high");
    }

    #[test]
    fn sort_top_to_bottom_orders_by_descending_y() {
        let mut lines = cluster_lines(vec![
            token("low", 10.0, 100.0),
            token("high", 10.0, 700.0),
            token("mid", 10.0, 400.0),
        ]);

        sort_top_to_bottom(&mut lines);

        let texts: Vec<String> = lines.iter().map(Line::text).collect();
        assert_eq!(texts, vec!["high", "mid", "low"]);
    }
}
