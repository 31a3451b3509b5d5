//! Recorded fragment pages.
//!
//! A fragment file is a JSON array of pages, each an array of
//! `{"text": ..., "transform": [a, b, c, d, x, y]}` objects. It lets a run
//! be replayed without the PDF, or fed from a different decoder.

use holdings_extract_layout_models::RawFragment;

use crate::{PageSource, PdfError};

/// Pages of fragments held in memory.
#[derive(Debug, Clone, Default)]
pub struct FragmentPages {
    label: String,
    pages: Vec<Vec<RawFragment>>,
}

impl FragmentPages {
    /// Wraps already-collected pages.
    #[must_use]
    pub fn new(label: &str, pages: Vec<Vec<RawFragment>>) -> Self {
        Self {
            label: label.to_owned(),
            pages,
        }
    }

    /// Parses a fragment file.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Fixture`] if `json` is not an array of pages of
    /// fragments.
    pub fn from_json(label: &str, json: &[u8]) -> Result<Self, PdfError> {
        let pages: Vec<Vec<RawFragment>> = serde_json::from_slice(json)?;
        Ok(Self::new(label, pages))
    }

    /// Loads a fragment file from a path or URL.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the file cannot be read or parsed.
    pub async fn open(location: &str) -> Result<Self, PdfError> {
        let bytes = crate::download::load_bytes(location).await?;
        Self::from_json(location, &bytes)
    }

    /// Serializes pages in the fragment file format.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Fixture`] if serialization fails.
    pub fn to_json(pages: &[Vec<RawFragment>]) -> Result<String, PdfError> {
        Ok(serde_json::to_string_pretty(pages)?)
    }
}

impl PageSource for FragmentPages {
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
