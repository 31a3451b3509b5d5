//! Text run collection through the [`pdf_extract::OutputDev`] callbacks.
//!
//! `pdf_extract` reports one glyph at a time, bracketed by
//! `begin_word`/`end_word` around each string it shows. A kerned `TJ`
//! array therefore arrives as several brackets (`[(Fu) -20 (nd name)]` is
//! two), with no marker for where the operator started or ended.
//!
//! [`FragmentCollector`] rebuilds one fragment per text-showing operation
//! by coalescing brackets: a bracket that starts on the previous run's
//! baseline, within [`RUN_JOIN_MAX_GAP_EM`] of where the previous glyph's
//! advance ended, continues that run. Text positioning operators (`Td`,
//! `Tm`, `T*`, ...) always end a run. Each fragment's transform is the text
//! rendering matrix of its first glyph.

use std::panic::{self, AssertUnwindSafe};

use holdings_extract_layout_models::RawFragment;
use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};

use crate::PdfError;

/// Largest distance, in ems of the current font, between the end of one
/// run and the start of the next for the two to be joined.
pub const RUN_JOIN_MAX_GAP_EM: f64 = 0.15;

/// Baselines closer than this (in device units) count as the same line.
const BASELINE_EPSILON: f64 = 1e-3;

/// A fragment still accepting glyphs.
#[derive(Debug)]
struct OpenRun {
    fragment: RawFragment,
    /// Device x where the next glyph would be drawn without kerning.
    pen_x: f64,
    /// Device size of one em in the run's font.
    em: f64,
}

impl OpenRun {
    fn continues_at(&self, x: f64, y: f64) -> bool {
        self.em > 0.0
            && (self.fragment.y() - y).abs() <= BASELINE_EPSILON
            && (x - self.pen_x).abs() <= RUN_JOIN_MAX_GAP_EM * self.em
    }
}

/// Collects glyph runs into per-page fragment lists.
#[derive(Debug, Default)]
pub struct FragmentCollector {
    pages: Vec<Vec<RawFragment>>,
    run: Option<OpenRun>,
    /// Set by `begin_word` until the bracket's first glyph arrives.
    word_start: bool,
}

impl FragmentCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the collector, returning one fragment list per page.
    #[must_use]
    pub fn into_pages(mut self) -> Vec<Vec<RawFragment>> {
        self.flush();
        self.pages
    }

    fn flush(&mut self) {
        if let Some(run) = self.run.take()
            && let Some(page) = self.pages.last_mut()
        {
            page.push(run.fragment);
        }
    }

    fn push_glyph(
        &mut self,
        trm: &Transform,
        width: f64,
        spacing: f64,
        font_size: f64,
        glyph: &str,
    ) {
        let (x, y) = (trm.m31, trm.m32);

        let continues = self
            .run
            .as_ref()
            .is_some_and(|run| !self.word_start || run.continues_at(x, y));
        self.word_start = false;

        if !continues {
            self.flush();
            self.run = Some(OpenRun {
                fragment: RawFragment {
                    text: String::new(),
                    transform: [trm.m11, trm.m12, trm.m21, trm.m22, x, y],
                },
                pen_x: x,
                em: font_size * trm.m11.abs(),
            });
        }

        if let Some(run) = &mut self.run {
            run.fragment.text.push_str(glyph);
            run.pen_x = x + (width * font_size + spacing) * trm.m11;
        }
    }
}

impl OutputDev for FragmentCollector {
    fn begin_page(
        &mut self,
        page_num: u32,
        _media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.flush();
        log::trace!("Collecting fragments for page {page_num}");
        self.pages.push(Vec::new());
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.flush();
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        self.push_glyph(trm, width, spacing, font_size, char);
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        self.word_start = true;
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        self.flush();
        Ok(())
    }
}

/// Decodes a PDF held in memory into per-page fragment lists.
///
/// # Errors
///
/// Returns [`PdfError::Decode`] if the document cannot be parsed, or if
/// the decoder aborts part-way through a page.
pub fn decode_pages(bytes: &[u8]) -> Result<Vec<Vec<RawFragment>>, PdfError> {
    let doc = pdf_extract::Document::load_mem(bytes)
        .map_err(|e| PdfError::Decode(format!("failed to open PDF: {e}")))?;

    // pdf_extract panics on some malformed content streams.
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut collector = FragmentCollector::new();
        pdf_extract::output_doc(&doc, &mut collector).map(|()| collector.into_pages())
    }));

    match outcome {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(PdfError::Decode(format!(
            "failed to extract text from PDF: {e}"
        ))),
        Err(_) => Err(PdfError::Decode(
            "PDF decoder aborted while reading page content".to_owned(),
        )),
    }
}
