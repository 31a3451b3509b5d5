#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-issuer statement table configurations.
//!
//! Every brokerage or fund platform lays out its holdings table slightly
//! differently. An [`IssuerDefinition`] captures that layout as a
//! [`TableConfig`] loaded from TOML. The built-in issuers are embedded at
//! compile time (see [`registry`]); users can add or override issuers from
//! their own TOML files.

pub mod registry;

use std::fmt;
use std::path::PathBuf;

use holdings_extract_table_models::TableConfig;
use serde::Deserialize;

pub use registry::{BuiltinIssuer, IssuerRegistry};

/// Errors raised while loading or resolving issuer configurations.
#[derive(Debug, thiserror::Error)]
pub enum IssuerError {
    /// The requested issuer is not configured.
    #[error("Configuration not found for issuer '{issuer}' (available: {})", .available.join(", "))]
    ConfigNotFound {
        /// The identifier that was looked up.
        issuer: String,
        /// Identifiers that are configured.
        available: Vec<String>,
    },

    /// An issuer TOML document failed to parse.
    #[error("Invalid issuer config {source_name}: {message}")]
    Parse {
        /// File name or label of the document.
        source_name: String,
        /// Parser message.
        message: String,
    },

    /// Two user-supplied files declare the same issuer id.
    #[error("Issuer '{0}' is defined more than once")]
    DuplicateId(String),

    /// Reading a config file or directory failed.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// The path being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// A normalized issuer identifier.
///
/// Identifiers compare case-insensitively with surrounding whitespace
/// ignored, so `"Endowus"` and `" endowus "` name the same issuer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IssuerId(String);

impl IssuerId {
    /// Normalizes `raw` into an identifier.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// The normalized identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssuerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IssuerId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// One issuer's statement layout.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuerDefinition {
    /// Identifier used to select the issuer (e.g. `"endowus"`).
    pub id: String,
    /// Display name (e.g. `"Endowus"`).
    pub name: String,
    /// Table boundary and column rules.
    #[serde(flatten)]
    pub table: TableConfig,
}

impl IssuerDefinition {
    /// The normalized identifier of this issuer.
    #[must_use]
    pub fn issuer_id(&self) -> IssuerId {
        IssuerId::new(&self.id)
    }
}

/// Parses one issuer definition from TOML text.
///
/// # Errors
///
/// Returns [`IssuerError::Parse`] if the document is malformed or is
/// missing required fields.
pub fn parse_issuer_toml(
    source_name: &str,
    toml_str: &str,
) -> Result<IssuerDefinition, IssuerError> {
    let definition: IssuerDefinition =
        toml::de::from_str(toml_str).map_err(|e| IssuerError::Parse {
            source_name: source_name.to_owned(),
            message: e.to_string(),
        })?;

    if definition.id.trim().is_empty() {
        return Err(IssuerError::Parse {
            source_name: source_name.to_owned(),
            message: "issuer id is empty".to_owned(),
        });
    }

    if definition.table.trigger.key.is_empty() {
        return Err(IssuerError::Parse {
            source_name: source_name.to_owned(),
            message: "trigger key is empty".to_owned(),
        });
    }

    Ok(definition)
}

#[cfg(test)]
mod tests {
    use holdings_extract_table_models::{MatchMode, PageBoundary};

    use super::*;

    #[test]
    fn issuer_ids_are_case_and_whitespace_insensitive() {
        assert_eq!(IssuerId::new(" Endowus "), IssuerId::new("endowus"));
        assert_eq!(IssuerId::new("SAXO").as_str(), "saxo");
    }

    #[test]
    fn parses_issuer_with_optional_page_boundary() {
        let def = parse_issuer_toml(
            "custom.toml",
            r#"
            id = "acme"
            name = "Acme Securities"
            page_boundary = "reset"

            [trigger]
            phrases = ["Holding", "Quantity"]
            key = "Holding"
            rule = "all"

            [stop]
            phrases = ["Subtotal"]
            "#,
        )
        .unwrap();

        assert_eq!(def.issuer_id().as_str(), "acme");
        assert_eq!(def.table.trigger.rule.rule, MatchMode::All);
        assert_eq!(def.table.page_boundary, PageBoundary::Reset);
    }

    #[test]
    fn rejects_missing_stop_rule() {
        let err = parse_issuer_toml(
            "broken.toml",
            r#"
            id = "broken"
            name = "Broken"

            [trigger]
            phrases = ["Holding"]
            key = "Holding"
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, IssuerError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn rejects_empty_trigger_key() {
        let err = parse_issuer_toml(
            "nokey.toml",
            r#"
            id = "nokey"
            name = "No Key"

            [trigger]
            phrases = ["Holding"]
            key = ""

            [stop]
            phrases = ["Total"]
            "#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("trigger key is empty"));
    }
}
