#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Positioned text fragments from PDF statements.
//!
//! Statement PDFs expose no table structure, only text runs placed on the
//! page. This crate is the boundary to the PDF decoder: it yields, per
//! page, the raw [`RawFragment`]s that the layout and table crates turn
//! into rows.
//!
//! The primary abstraction is [`PageSource`]. [`PdfDocument`] implements
//! it on top of [`pdf_extract`]; [`fixture::FragmentPages`] implements it
//! for fragments recorded as JSON.

pub mod download;
pub mod fixture;
pub mod fragments;

pub use fixture::FragmentPages;
pub use holdings_extract_layout_models::RawFragment;

/// Errors raised while obtaining page fragments.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// An HTTP request to download a PDF failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The document could not be opened or decoded.
    #[error("Failed to decode document: {0}")]
    Decode(String),

    /// A page index past the end of the document was requested.
    #[error("Page {page} out of range (document has {page_count} pages)")]
    PageOutOfRange {
        /// Zero-based page index requested.
        page: u32,
        /// Number of pages in the document.
        page_count: u32,
    },

    /// A recorded fragment file is not valid JSON.
    #[error("Invalid fragment file: {0}")]
    Fixture(#[from] serde_json::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A paged document that yields raw text fragments.
///
/// Pages are fetched one at a time, in order, by the extraction driver.
pub trait PageSource: Send + Sync {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Returns the fragments of the zero-based page `page`, in decoder
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the page cannot be decoded or does not
    /// exist.
    fn fetch_page(
        &self,
        page: u32,
    ) -> impl std::future::Future<Output = Result<Vec<RawFragment>, PdfError>> + Send;

    /// Human-readable label for log messages (e.g. the file name).
    fn label(&self) -> &str;
}

/// A PDF decoded with [`pdf_extract`].
///
/// Decoding happens once in [`PdfDocument::from_bytes`]; pages are then
/// served from memory.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    label: String,
    pages: Vec<Vec<RawFragment>>,
}

impl PdfDocument {
    /// Decodes `bytes` as a PDF.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Decode`] if the bytes are not a readable PDF.
    pub fn from_bytes(label: &str, bytes: &[u8]) -> Result<Self, PdfError> {
        let pages = fragments::decode_pages(bytes)?;

        log::debug!(
            "[{label}] Decoded {} pages ({} fragments)",
            pages.len(),
            pages.iter().map(Vec::len).sum::<usize>()
        );

        Ok(Self {
            label: label.to_owned(),
            pages,
        })
    }

    /// Loads and decodes the PDF at `location` (a path or an
    /// `http(s)://` URL).
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the document cannot be read or decoded.
    pub async fn open(location: &str) -> Result<Self, PdfError> {
        let bytes = download::load_bytes(location).await?;
        Self::from_bytes(location, &bytes)
    }

    /// All decoded pages.
    #[must_use]
    pub fn pages(&self) -> &[Vec<RawFragment>] {
        &self.pages
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> u32 {
        u32::try_from(self.pages.len()).unwrap_or(u32::MAX)
    }

    async fn fetch_page(&self, page: u32) -> Result<Vec<RawFragment>, PdfError> {
        self.pages
            .get(page as usize)
            .cloned()
            .ok_or_else(|| PdfError::PageOutOfRange {
                page,
                page_count: self.page_count(),
            })
    }

    fn label(&self) -> &str {
        &self.label
    }
}
