#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for holdings extraction.
//!
//! `extract` prints the target column of an issuer's holdings table,
//! `lines` shows how a document's text was grouped into rows, `issuers`
//! lists the configured layouts, and `dump-fragments` records a PDF's raw
//! text runs for later replay. With no subcommand an interactive menu is
//! shown instead.
//!
//! Uses `indicatif-log-bridge` (via
//! [`holdings_extract_cli_utils::init_logger`]) so log lines and the page
//! progress bar never fight for the terminal.

mod input;
mod interactive;
mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use holdings_extract_cli_utils::{IndicatifProgress, MultiProgress};
use holdings_extract_issuer::{IssuerError, IssuerRegistry};
use holdings_extract_pdf::{FragmentPages, PdfDocument};
use holdings_extract_table::{extract_for_issuer, reconstruct_document};
use holdings_extract_table_models::LineOrder;

use crate::input::InputDocument;
use crate::output::{
    ExtractReport, OutputFormat, render_extraction, render_issuers, render_lines,
};

#[derive(Parser)]
#[command(
    name = "holdings_extract",
    about = "Extract holdings columns from brokerage statement PDFs"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    issuers: IssuerArgs,
}

/// Where issuer layouts beyond the built-in ones come from.
#[derive(Args)]
struct IssuerArgs {
    /// Directory of issuer TOML files that add to or override the built-ins
    #[arg(long, global = true, env = "HOLDINGS_EXTRACT_ISSUER_DIR")]
    issuer_dir: Option<PathBuf>,
    /// Extra issuer TOML file (repeatable), applied after `--issuer-dir`
    #[arg(long, global = true)]
    issuer_file: Vec<PathBuf>,
}

impl IssuerArgs {
    fn registry(&self) -> Result<IssuerRegistry, IssuerError> {
        let mut registry = IssuerRegistry::builtin();
        if let Some(dir) = &self.issuer_dir {
            let loaded = registry.load_dir(dir)?;
            log::debug!("Loaded {} issuer(s) from {}", loaded.len(), dir.display());
        }
        for file in &self.issuer_file {
            registry.load_file(file)?;
        }
        Ok(registry)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the configured column from a statement
    Extract {
        /// PDF path or `http(s)://` URL (or a fragment dump with `--fragments`)
        input: String,
        /// Issuer identifier (e.g., "endowus")
        #[arg(long)]
        issuer: String,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
        /// Treat INPUT as a JSON fragment dump rather than a PDF
        #[arg(long)]
        fragments: bool,
    },
    /// Print each page's reconstructed lines
    Lines {
        /// PDF path or `http(s)://` URL (or a fragment dump with `--fragments`)
        input: String,
        /// Treat INPUT as a JSON fragment dump rather than a PDF
        #[arg(long)]
        fragments: bool,
        /// Use this issuer's line order
        #[arg(long)]
        issuer: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// List configured issuers
    Issuers,
    /// Decode a PDF and write its raw text fragments as JSON
    DumpFragments {
        /// PDF path or `http(s)://` URL
        input: String,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let multi = holdings_extract_cli_utils::init_logger();
    let cli = Cli::parse();

    if let Err(e) = run(cli, &multi).await {
        log::debug!("Run failed: {e:?}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let registry = cli.issuers.registry()?;

    let Some(command) = cli.command else {
        return interactive::run(multi, &registry).await;
    };

    match command {
        Commands::Extract {
            input,
            issuer,
            format,
            fragments,
        } => {
            // Fail on an unknown issuer before reading the document.
            registry.resolve(&issuer)?;

            let document = InputDocument::open(&input, fragments).await?;
            let progress = IndicatifProgress::pages_bar(multi, &input);
            let extraction = extract_for_issuer(&document, &registry, &issuer, &progress).await?;

            let report = ExtractReport {
                source: &input,
                issuer: &issuer,
                extraction: &extraction,
            };
            print!("{}", render_extraction(&report, format)?);
        }
        Commands::Lines {
            input,
            fragments,
            issuer,
            format,
        } => {
            let order = match &issuer {
                Some(id) => registry.resolve(id)?.table.line_order,
                None => LineOrder::default(),
            };

            let document = InputDocument::open(&input, fragments).await?;
            let pages = reconstruct_document(&document, order).await?;

            match format {
                OutputFormat::Text => print!("{}", render_lines(&pages)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&pages)?),
            }
        }
        Commands::Issuers => print!("{}", render_issuers(&registry)),
        Commands::DumpFragments { input, output } => {
            let document = PdfDocument::open(&input).await?;
            let json = FragmentPages::to_json(document.pages())?;

            match output {
                Some(path) => {
                    tokio::fs::write(&path, json).await?;
                    log::info!(
                        "Wrote {} pages of fragments to {}",
                        document.pages().len(),
                        path.display()
                    );
                }
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}
