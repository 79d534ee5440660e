//! Bulk-load records from a CSV or XLSX file.

use tillroll_core::SystemDefaults;
use tillroll_report::import_file;
use tillroll_warehouse::Warehouse;

use crate::cli::ImportArgs;
use crate::error::CliError;

pub fn run(warehouse: &Warehouse, args: &ImportArgs) -> Result<(), CliError> {
    let mut defaults = SystemDefaults::default();
    let outcome = import_file(&args.file, &mut defaults)?;

    // All-or-nothing: the batch commits only after every good row normalized.
    warehouse.insert_many(&outcome.records)?;

    if outcome.rows_skipped() > 0 {
        eprintln!(
            "⚠ Skipped {} of {} rows that failed validation",
            outcome.rows_skipped(),
            outcome.rows_total
        );
    }
    eprintln!(
        "✓ Imported {} records from {}",
        outcome.rows_imported,
        args.file.display()
    );
    Ok(())
}
