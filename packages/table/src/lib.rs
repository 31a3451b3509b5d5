#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Column extraction from statement PDFs.
//!
//! Given a document's pages of positioned text and an issuer's
//! [`TableConfig`](holdings_extract_table_models::TableConfig), this crate
//! finds each holdings table (via [`matcher`] phrase rules), locks onto the
//! x-position of the configured header cell, and collects every value
//! aligned beneath it ([`extractor`]). [`driver`] runs that over a whole
//! document and cleans the result.

pub mod driver;
pub mod extractor;
pub mod matcher;
pub mod progress;

use holdings_extract_issuer::IssuerError;
use holdings_extract_pdf::PdfError;

pub use driver::{
    ColumnExtraction, PageLines, extract_column, extract_for_issuer, reconstruct_document,
};
pub use extractor::{COLUMN_ALIGN_TOLERANCE, ColumnExtractor, ExtractionState, LineEvent};

/// Errors that abort a document scan.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The selected issuer could not be resolved.
    #[error(transparent)]
    Issuer(#[from] IssuerError),

    /// The PDF decoder failed to open or read a page.
    #[error("Document decode failure: {0}")]
    DocumentDecode(#[from] PdfError),
}

impl ExtractError {
    /// Whether the run failed because the issuer is not configured.
    #[must_use]
    pub const fn is_config_not_found(&self) -> bool {
        matches!(self, Self::Issuer(IssuerError::ConfigNotFound { .. }))
    }
}
