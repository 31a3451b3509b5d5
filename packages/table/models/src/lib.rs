#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Declarative table boundary configuration.
//!
//! A [`TableConfig`] tells the column extractor how to recognise where a
//! holdings table starts (its [`TriggerRule`]) and where it ends (its stop
//! [`MatchRule`]). Configs are deserialized from per-issuer TOML files.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How the phrases of a [`MatchRule`] combine when order is not enforced.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchMode {
    /// At least one phrase must appear.
    #[default]
    Any,
    /// Every phrase must appear.
    All,
}

/// A phrase predicate evaluated against the text of one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRule {
    /// Phrases tested as substrings of the line text.
    pub phrases: Vec<String>,
    /// How phrases combine when `enforce_order` is false.
    #[serde(default)]
    pub rule: MatchMode,
    /// Whether matching respects letter case.
    #[serde(default)]
    pub case_sensitive: bool,
    /// Require every phrase to appear, each after the end of the previous
    /// one. Takes precedence over `rule`.
    #[serde(default)]
    pub enforce_order: bool,
}

impl MatchRule {
    /// Creates a case-insensitive, unordered rule.
    #[must_use]
    pub fn new<S: Into<String>>(phrases: impl IntoIterator<Item = S>, rule: MatchMode) -> Self {
        Self {
            phrases: phrases.into_iter().map(Into::into).collect(),
            rule,
            case_sensitive: false,
            enforce_order: false,
        }
    }

    /// Sets case sensitivity.
    #[must_use]
    pub const fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Sets whether phrase order is enforced.
    #[must_use]
    pub const fn with_enforce_order(mut self, enforce_order: bool) -> Self {
        self.enforce_order = enforce_order;
        self
    }
}

/// The table-start rule plus the header phrase that anchors the target
/// column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerRule {
    /// Text searched for (case-sensitively) inside the header line's
    /// tokens. The first token containing it fixes the column's x.
    pub key: String,
    /// When the line counts as a table header.
    #[serde(flatten)]
    pub rule: MatchRule,
}

/// Whether an open extraction window survives a page break.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PageBoundary {
    /// Keep extracting on the next page until a stop line is found.
    #[default]
    Carry,
    /// Every page starts idle and needs its own header line.
    Reset,
}

/// Order in which reconstructed lines are walked.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LineOrder {
    /// The order lines were first encountered in the decoder's output.
    #[default]
    FirstEncountered,
    /// Descending y, for decoders that do not emit reading order.
    TopToBottom,
}

/// Everything the column extractor needs to know about one issuer's
/// statement layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Table start and column anchor.
    pub trigger: TriggerRule,
    /// Table end.
    pub stop: MatchRule,
    /// Page break behavior.
    #[serde(default)]
    pub page_boundary: PageBoundary,
    /// Line walk order.
    #[serde(default)]
    pub line_order: LineOrder,
}

impl TableConfig {
    /// Creates a config with default page and line handling.
    #[must_use]
    pub fn new(key: impl Into<String>, trigger: MatchRule, stop: MatchRule) -> Self {
        Self {
            trigger: TriggerRule {
                key: key.into(),
                rule: trigger,
            },
            stop,
            page_boundary: PageBoundary::default(),
            line_order: LineOrder::default(),
        }
    }

    /// Sets the page break behavior.
    #[must_use]
    pub const fn with_page_boundary(mut self, page_boundary: PageBoundary) -> Self {
        self.page_boundary = page_boundary;
        self
    }

    /// Sets the line walk order.
    #[must_use]
    pub const fn with_line_order(mut self, line_order: LineOrder) -> Self {
        self.line_order = line_order;
        self
    }
}
