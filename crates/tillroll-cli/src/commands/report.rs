//! Generate the aggregated PDF sales report.

use std::fs;

use tillroll_core::{aggregate, SalesRecord, SystemDefaults};
use tillroll_report::{render_pdf, ReportLabels};
use tillroll_warehouse::Warehouse;

use crate::cli::ReportArgs;
use crate::error::CliError;

pub fn run(warehouse: &Warehouse, args: &ReportArgs) -> Result<(), CliError> {
    let stored = warehouse.query_all()?;
    let records: Vec<SalesRecord> = stored.into_iter().map(|stored| stored.record).collect();

    let mut defaults = SystemDefaults::default();
    let report = aggregate(records.iter(), &mut defaults)?;

    let mut labels = ReportLabels::default();
    if let Some(title) = &args.title {
        labels.title.clone_from(title);
    }
    if let Some(date_range) = &args.date_range {
        labels.date_range.clone_from(date_range);
    }

    let bytes = render_pdf(&report, &labels, args.logo.as_deref())?;
    fs::write(&args.file, bytes)?;

    eprintln!(
        "✓ Report over {} records written to {}",
        report.rows.len(),
        args.file.display()
    );
    Ok(())
}
