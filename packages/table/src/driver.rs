//! Document-level extraction.
//!
//! Pages are processed strictly in order, one at a time, because the
//! extraction state carries from one page into the next.

use std::collections::HashSet;
use std::sync::Arc;

use holdings_extract_issuer::IssuerRegistry;
use holdings_extract_layout::lines::sort_top_to_bottom;
use holdings_extract_layout::reconstruct_page;
use holdings_extract_layout_models::{Line, RawFragment};
use holdings_extract_pdf::PageSource;
use holdings_extract_table_models::{LineOrder, PageBoundary, TableConfig};
use serde::Serialize;

use crate::ExtractError;
use crate::extractor::ColumnExtractor;
use crate::progress::ProgressCallback;

/// The outcome of one document scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnExtraction {
    /// Column values in page-then-line order, blanks removed, first
    /// occurrence kept.
    pub values: Vec<String>,
    /// Number of pages processed.
    pub pages_scanned: u32,
    /// Number of tables opened.
    pub tables_opened: u32,
    /// Trigger lines that matched but had no token containing the key.
    pub inert_triggers: u32,
    /// Values emitted before blank removal and deduplication.
    pub raw_value_count: usize,
}

/// One page's reconstructed lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLines {
    /// Zero-based page index.
    pub page: u32,
    /// Lines in walk order.
    pub lines: Vec<Line>,
}

/// Reconstructs one page's lines in the given walk order.
#[must_use]
pub fn page_lines(fragments: &[RawFragment], order: LineOrder) -> Vec<Line> {
    let mut lines = reconstruct_page(fragments);
    if order == LineOrder::TopToBottom {
        sort_top_to_bottom(&mut lines);
    }
    lines
}

/// Drops blank values and repeats, keeping first occurrences in order.
///
/// Equality is exact and case-sensitive across the whole document.
#[must_use]
pub fn clean_values(values: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(values.len());
    values
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

/// Extracts the configured column from every page of `source`.
///
/// # Errors
///
/// Returns [`ExtractError::DocumentDecode`] if any page cannot be fetched.
/// The scan stops at that page and no partial result is returned.
pub async fn extract_column(
    source: &impl PageSource,
    config: &TableConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<ColumnExtraction, ExtractError> {
    let label = source.label();
    let page_count = source.page_count();
    let mut extractor = ColumnExtractor::new(config);
    let mut raw: Vec<String> = Vec::new();

    progress.set_total(u64::from(page_count));

    for page in 0..page_count {
        if config.page_boundary == PageBoundary::Reset {
            extractor.reset();
        }

        progress.set_message(format!("[{label}] page {}/{page_count}", page + 1));

        let fragments = match source.fetch_page(page).await {
            Ok(fragments) => fragments,
            Err(e) => {
                log::error!("[{label}] Failed to read page {}: {e}", page + 1);
                progress.finish_and_clear();
                return Err(e.into());
            }
        };
        let lines = page_lines(&fragments, config.line_order);
        let values = extractor.process_page(&lines);

        log::debug!(
            "[{label}] Page {}/{page_count}: {} lines, {} values, state {:?}",
            page + 1,
            lines.len(),
            values.len(),
            extractor.state()
        );

        raw.extend(values);
        progress.inc(1);
    }

    let raw_value_count = raw.len();
    let values = clean_values(raw);

    log::info!(
        "[{label}] Extracted {} values ({raw_value_count} raw) from {page_count} pages, {} tables",
        values.len(),
        extractor.tables_opened()
    );
    progress.finish(format!("[{label}] {} values", values.len()));

    Ok(ColumnExtraction {
        values,
        pages_scanned: page_count,
        tables_opened: extractor.tables_opened(),
        inert_triggers: extractor.inert_triggers(),
        raw_value_count,
    })
}

/// Resolves `issuer` in `registry`, then extracts its column from
/// `source`.
///
/// # Errors
///
/// Returns [`ExtractError::Issuer`] (config not found) before touching
/// any page if `issuer` is not configured, or
/// [`ExtractError::DocumentDecode`] if a page cannot be fetched.
pub async fn extract_for_issuer(
    source: &impl PageSource,
    registry: &IssuerRegistry,
    issuer: &str,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<ColumnExtraction, ExtractError> {
    let definition = registry.resolve(issuer)?;

    log::info!(
        "[{}] Extracting '{}' column using {} layout",
        source.label(),
        definition.table.trigger.key,
        definition.name
    );

    extract_column(source, &definition.table, progress).await
}

/// Reconstructs every page's lines without extracting anything.
///
/// # Errors
///
/// Returns [`ExtractError::DocumentDecode`] if any page cannot be fetched.
pub async fn reconstruct_document(
    source: &impl PageSource,
    order: LineOrder,
) -> Result<Vec<PageLines>, ExtractError> {
    let mut pages = Vec::with_capacity(source.page_count() as usize);
    for page in 0..source.page_count() {
        let fragments = source.fetch_page(page).await?;
        pages.push(PageLines {
            page,
            lines: page_lines(&fragments, order),
        });
    }
    Ok(pages)
}
