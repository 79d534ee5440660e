//! # Tillroll Report
//!
//! File codecs and report rendering for tillroll.
//!
//! ## Overview
//!
//! Three concerns live here, all downstream of the core normalizer and
//! aggregator:
//!
//! - **Export**: write stored records to CSV or XLSX, one row per record,
//!   columns in the shared wire order.
//! - **Import**: read CSV or XLSX rows back into raw records and run each
//!   through the normalizer, skipping rows the normalizer rejects.
//! - **Rendering**: rasterize pie and bar charts and assemble the full PDF
//!   report around them.

pub mod chart;
pub mod csv;
pub mod error;
pub mod pdf;
pub mod xlsx;

use std::path::Path;

use tillroll_core::{normalize, DefaultsSource, RawRecord, SalesRecord, DATE_FORMAT};

pub use chart::{bar_chart, pie_chart, PALETTE};
pub use error::{ExportError, ImportError, RenderError};
pub use pdf::{render_pdf, ReportLabels};

/// Result of a bulk file import.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Records that normalized cleanly, in file order.
    pub records: Vec<SalesRecord>,
    /// Data rows found in the file, including rejected ones.
    pub rows_total: usize,
    /// Rows that normalized cleanly.
    pub rows_imported: usize,
}

impl ImportOutcome {
    /// Rows the normalizer rejected.
    #[must_use]
    pub fn rows_skipped(&self) -> usize {
        self.rows_total - self.rows_imported
    }
}

/// Read a CSV or XLSX file and normalize its rows.
///
/// The codec is chosen by file extension. A row the normalizer rejects is
/// skipped and tallied; a missing header column aborts the whole import.
///
/// # Errors
/// Returns [`ImportError`] when the file cannot be decoded at all; per-row
/// normalization failures are not errors.
pub fn import_file(
    path: &Path,
    defaults: &mut dyn DefaultsSource,
) -> Result<ImportOutcome, ImportError> {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let raws = match extension.as_str() {
        "csv" => csv::read_rows(path)?,
        "xlsx" | "xls" | "xlsm" => xlsx::read_rows(path)?,
        other => return Err(ImportError::UnsupportedFile(other.to_string())),
    };

    let rows_total = raws.len();
    let records: Vec<SalesRecord> = raws
        .iter()
        .filter_map(|raw| normalize(raw, defaults).ok())
        .collect();
    let rows_imported = records.len();

    Ok(ImportOutcome {
        records,
        rows_total,
        rows_imported,
    })
}

/// One record's cells in wire column order, ready for a file row.
pub(crate) fn wire_cells(record: &SalesRecord) -> Result<[String; 11], ExportError> {
    let date_from = format_date(record.event_date_from)?;
    let date_to = format_date(record.event_date_to)?;
    Ok([
        record.event_name.clone(),
        date_from,
        date_to,
        record.venue_name.clone(),
        record.operating_hours.clone(),
        record.products_sold.clone(),
        record.sales_volume.to_string(),
        record.price_per_unit.to_string(),
        record.total_revenue.to_string(),
        record.sale_hour.to_string(),
        record.payment_method.clone(),
    ])
}

fn format_date(date: time::Date) -> Result<String, ExportError> {
    date.format(DATE_FORMAT)
        .map_err(|error| ExportError::Container(format!("unformattable date: {error}")))
}

/// Validate that a header row carries every wire column, returning a lookup
/// from column name to cell index.
pub(crate) fn validate_header(
    header: &[String],
) -> Result<Vec<(&'static str, usize)>, ImportError> {
    let mut mapping = Vec::with_capacity(tillroll_core::COLUMNS.len());
    let mut missing = Vec::new();

    for column in tillroll_core::COLUMNS {
        match header.iter().position(|cell| cell.trim() == column) {
            Some(index) => mapping.push((column, index)),
            None => missing.push(column.to_string()),
        }
    }

    if missing.is_empty() {
        Ok(mapping)
    } else {
        Err(ImportError::MissingColumns(missing))
    }
}

/// Build a raw record from one file row using a validated header mapping.
pub(crate) fn row_to_raw(mapping: &[(&'static str, usize)], cells: &[String]) -> RawRecord {
    let mut raw = RawRecord::default();
    for (column, index) in mapping {
        if let Some(cell) = cells.get(*index) {
            if !cell.trim().is_empty() {
                raw.set_column(column, cell);
            }
        }
    }
    raw
}
