//! Menu-driven front end used when no subcommand is given.
//!
//! Mirrors `extract`: pick an issuer from the configured list, point at a
//! PDF, and print the column.

use dialoguer::{Confirm, Input, Select};
use holdings_extract_cli_utils::{IndicatifProgress, MultiProgress};
use holdings_extract_issuer::{IssuerDefinition, IssuerRegistry};
use holdings_extract_table::extract_for_issuer;

use crate::input::InputDocument;
use crate::output::{ExtractReport, OutputFormat, render_extraction, render_issuers};

/// Top-level actions in the interactive menu.
enum Action {
    Extract,
    ListIssuers,
}

impl Action {
    const ALL: &[Self] = &[Self::Extract, Self::ListIssuers];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Extract => "Extract holdings from a statement",
            Self::ListIssuers => "List configured issuers",
        }
    }
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected extraction fails.
pub async fn run(
    multi: &MultiProgress,
    registry: &IssuerRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Extract => extract(multi, registry).await?,
        Action::ListIssuers => print!("{}", render_issuers(registry)),
    }

    Ok(())
}

/// Menu entry for one issuer, e.g. `endowus (Endowus)`.
fn issuer_label(issuer: &IssuerDefinition) -> String {
    format!("{} ({})", issuer.issuer_id(), issuer.name)
}

async fn extract(
    multi: &MultiProgress,
    registry: &IssuerRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    if registry.is_empty() {
        println!("No issuers configured.");
        return Ok(());
    }

    let issuers: Vec<_> = registry.iter().collect();
    let labels: Vec<String> = issuers.iter().map(|i| issuer_label(i)).collect();

    let idx = Select::new()
        .with_prompt("Issuer")
        .items(&labels)
        .default(0)
        .interact()?;
    let issuer = issuers[idx].issuer_id();

    let location: String = Input::new()
        .with_prompt("Statement PDF (path or URL)")
        .interact_text()?;
    let location = location.trim();

    let as_json = Confirm::new()
        .with_prompt("Print the full JSON report?")
        .default(false)
        .interact()?;
    let format = if as_json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let document = InputDocument::open(location, false).await?;
    let progress = IndicatifProgress::pages_bar(multi, location);
    let extraction = extract_for_issuer(&document, registry, issuer.as_str(), &progress).await?;

    let report = ExtractReport {
        source: location,
        issuer: issuer.as_str(),
        extraction: &extraction,
    };
    print!("{}", render_extraction(&report, format)?);

    Ok(())
}
