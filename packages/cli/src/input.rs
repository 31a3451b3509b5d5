//! Opening the document named on the command line.

use holdings_extract_pdf::{FragmentPages, PageSource, PdfDocument, PdfError, RawFragment};

/// Either a decoded PDF or a replayed fragment dump.
pub enum InputDocument {
    Pdf(PdfDocument),
    Fragments(FragmentPages),
}

impl InputDocument {
    /// Opens `location` as a fragment dump when `fragments` is set,
    /// otherwise as a PDF.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the input cannot be read or decoded.
    pub async fn open(location: &str, fragments: bool) -> Result<Self, PdfError> {
        if fragments {
            log::debug!("Reading fragment dump {location}");
            Ok(Self::Fragments(FragmentPages::open(location).await?))
        } else {
            log::debug!("Decoding PDF {location}");
            Ok(Self::Pdf(PdfDocument::open(location).await?))
        }
    }
}

impl PageSource for InputDocument {
    fn page_count(&self) -> u32 {
        match self {
            Self::Pdf(doc) => doc.page_count(),
            Self::Fragments(pages) => pages.page_count(),
        }
    }

    async fn fetch_page(&self, page: u32) -> Result<Vec<RawFragment>, PdfError> {
        match self {
            Self::Pdf(doc) => doc.fetch_page(page).await,
            Self::Fragments(pages) => pages.fetch_page(page).await,
        }
    }

    fn label(&self) -> &str {
        match self {
            Self::Pdf(doc) => doc.label(),
            Self::Fragments(pages) => pages.label(),
        }
    }
}
