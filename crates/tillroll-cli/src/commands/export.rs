//! Write stored records to a CSV or XLSX file.

use tillroll_report::{csv, error::ExportError, xlsx};
use tillroll_warehouse::Warehouse;

use crate::cli::ExportArgs;
use crate::error::CliError;

pub fn run(warehouse: &Warehouse, args: &ExportArgs) -> Result<(), CliError> {
    let records = warehouse.query_all()?;
    if records.is_empty() {
        eprintln!("⚠ No records stored yet; writing header only");
    }

    let extension = args
        .file
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => csv::export_records(&args.file, &records)?,
        "xlsx" => xlsx::export_records(&args.file, &records)?,
        other => {
            return Err(CliError::Export(ExportError::Container(format!(
                "unsupported export type '{other}', expected .csv or .xlsx"
            ))))
        }
    }

    eprintln!(
        "✓ Exported {} records to {}",
        records.len(),
        args.file.display()
    );
    Ok(())
}
