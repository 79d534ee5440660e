//! CLI argument definitions for tillroll.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `save` | Record one sale, filling any missing fields with defaults |
//! | `list` | Print every stored record as JSON |
//! | `import` | Bulk-load records from a CSV or XLSX file |
//! | `export` | Write stored records to a CSV or XLSX file |
//! | `report` | Generate the full PDF sales report |
//!
//! # Examples
//!
//! ```bash
//! # Record a sale; unspecified fields are defaulted
//! tillroll save --event-name "Spring Fair" --venue-name "Town Hall"
//!
//! # Record a sale from a JSON payload
//! tillroll save --json '{"eventName":"Gala","venueName":"Pier","salesVolume":120}'
//!
//! # Bulk-load a spreadsheet, then export everything as CSV
//! tillroll import sales.xlsx
//! tillroll export sales.csv
//!
//! # Build the PDF report with a letterhead logo
//! tillroll report sales-report.pdf --logo logo.png
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// tillroll - retail and event sales recorder
///
/// Records individual sales with sensible defaults for anything left out,
/// bulk-loads spreadsheets, and produces aggregated PDF reports from the
/// local DuckDB store.
#[derive(Debug, Parser)]
#[command(
    name = "tillroll",
    author,
    version,
    about = "Retail/event sales recording and reporting"
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record one sale.
    ///
    /// Event and venue names are required; every other field falls back to a
    /// default when omitted (today's dates, the current hour, randomized
    /// volume, price, and payment method).
    Save(SaveArgs),

    /// Print every stored record as JSON, oldest first.
    List,

    /// Bulk-load records from a CSV or XLSX file.
    ///
    /// Rows that fail normalization are skipped and tallied; a file whose
    /// header lacks a required column is rejected outright and nothing is
    /// stored.
    Import(ImportArgs),

    /// Write stored records to a CSV or XLSX file (chosen by extension).
    Export(ExportArgs),

    /// Generate the aggregated PDF sales report.
    Report(ReportArgs),
}

#[derive(Debug, Args)]
pub struct SaveArgs {
    /// Full record as a JSON object, using the wire field names
    /// (eventName, venueName, salesVolume, ...). Flag values below override
    /// matching payload fields.
    #[arg(long)]
    pub json: Option<String>,

    /// Event name (required unless supplied via --json).
    #[arg(long)]
    pub event_name: Option<String>,

    /// Venue name (required unless supplied via --json).
    #[arg(long)]
    pub venue_name: Option<String>,

    /// Operating hours, e.g. "12:00 PM - 11:00 PM".
    #[arg(long)]
    pub operating_hours: Option<String>,

    /// Event start date (YYYY-MM-DD). Both dates must be given together.
    #[arg(long)]
    pub date_from: Option<String>,

    /// Event end date (YYYY-MM-DD).
    #[arg(long)]
    pub date_to: Option<String>,

    /// Products sold, comma separated.
    #[arg(long)]
    pub products: Option<String>,

    /// Units sold.
    #[arg(long)]
    pub volume: Option<String>,

    /// Price per unit.
    #[arg(long)]
    pub price: Option<String>,

    /// Total revenue. Computed from volume and price when omitted.
    #[arg(long)]
    pub revenue: Option<String>,

    /// Hour of sale (0-23).
    #[arg(long)]
    pub hour: Option<String>,

    /// Payment method, e.g. Cash, Card, Contactless.
    #[arg(long)]
    pub payment: Option<String>,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// File to load (.csv or .xlsx).
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Destination file (.csv or .xlsx).
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Destination PDF file.
    pub file: PathBuf,

    /// Logo image placed at the top of the report.
    #[arg(long)]
    pub logo: Option<PathBuf>,

    /// Report title line.
    #[arg(long)]
    pub title: Option<String>,

    /// Reporting period line, free text.
    #[arg(long)]
    pub date_range: Option<String>,
}
