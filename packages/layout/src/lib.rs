#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Visual line reconstruction for PDFs that carry no table structure.
//!
//! Statements exported by brokerages and fund platforms usually render
//! their holdings tables as free-floating text runs. This crate rebuilds
//! the rows a reader sees:
//!
//! 1. [`normalize`] turns decoder fragments into trimmed
//!    [`PositionedToken`]s.
//! 2. [`lines::merge_wrapped`] rejoins cell text that wrapped onto a second
//!    printed line.
//! 3. [`lines::cluster_lines`] buckets tokens into [`Line`]s by y and orders
//!    each line left to right.
//!
//! [`reconstruct_page`] runs the whole pipeline for one page.

pub mod lines;
pub mod normalize;

use holdings_extract_layout_models::{Line, PositionedToken, RawFragment};

pub use lines::{LINE_CLUSTER_TOLERANCE, WRAP_MERGE_EXACT};

/// Normalizes, wrap-merges and clusters one page of raw fragments.
///
/// Lines come back in the order their buckets were first created, which
/// matches top-to-bottom only if the decoder emitted fragments in reading
/// order. Use [`lines::sort_top_to_bottom`] when it does not.
#[must_use]
pub fn reconstruct_page(fragments: &[RawFragment]) -> Vec<Line> {
    let tokens: Vec<PositionedToken> = normalize::normalize_page(fragments);
    let merged = lines::merge_wrapped(tokens);
    let lines = lines::cluster_lines(merged);

    log::trace!(
        "Reconstructed {} lines from {} fragments",
        lines.len(),
        fragments.len()
    );

    lines
}
