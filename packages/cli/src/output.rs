//! Rendering command results for the terminal.

use std::fmt::Write as _;

use holdings_extract_issuer::IssuerRegistry;
use holdings_extract_table::{ColumnExtraction, PageLines};
use serde::Serialize;

/// Output format for `extract`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One value per line.
    #[default]
    Text,
    /// The full extraction report as JSON.
    Json,
}

/// JSON shape printed by `extract --format json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractReport<'a> {
    pub source: &'a str,
    pub issuer: &'a str,
    #[serde(flatten)]
    pub extraction: &'a ColumnExtraction,
}

/// Renders the extracted values in `format`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_extraction(
    report: &ExtractReport<'_>,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(report
            .extraction
            .values
            .iter()
            .map(|v| format!("{v}\n"))
            .collect()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
    }
}

/// Renders reconstructed lines, one `y` and joined text per row, grouped
/// under a page heading.
#[must_use]
pub fn render_lines(pages: &[PageLines]) -> String {
    let mut out = String::new();
    for page in pages {
        let _ = writeln!(out, "--- Page {} ({} lines) ---", page.page + 1, page.lines.len());
        for line in &page.lines {
            let _ = writeln!(out, "{:>8.2}  {}", line.y, line.text());
        }
    }
    out
}

/// Renders the issuer listing.
#[must_use]
pub fn render_issuers(registry: &IssuerRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<20} {:<24} KEY", "ID", "NAME");
    let _ = writeln!(out, "{}", "-".repeat(60));
    for issuer in registry.iter() {
        let _ = writeln!(
            out,
            "{:<20} {:<24} {}",
            issuer.issuer_id(),
            issuer.name,
            issuer.table.trigger.key
        );
    }
    out
}
