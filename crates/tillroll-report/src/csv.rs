//! CSV import and export.

use std::path::Path;

use tillroll_core::{RawRecord, StoredRecord, COLUMNS};

use crate::error::{ExportError, ImportError};
use crate::{row_to_raw, validate_header, wire_cells};

/// Write records to a CSV file with the wire header row.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn export_records(path: &Path, records: &[StoredRecord]) -> Result<(), ExportError> {
    let mut writer = ::csv::Writer::from_path(path).map_err(csv_export_error)?;
    writer.write_record(COLUMNS).map_err(csv_export_error)?;
    for stored in records {
        let cells = wire_cells(&stored.record)?;
        writer.write_record(&cells).map_err(csv_export_error)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read the data rows of a CSV file as raw records.
///
/// # Errors
/// Returns an error if the file cannot be decoded or its header lacks a
/// required column.
pub fn read_rows(path: &Path) -> Result<Vec<RawRecord>, ImportError> {
    let mut reader = ::csv::Reader::from_path(path).map_err(csv_import_error)?;

    let header: Vec<String> = reader
        .headers()
        .map_err(csv_import_error)?
        .iter()
        .map(str::to_string)
        .collect();
    let mapping = validate_header(&header)?;

    let mut raws = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_import_error)?;
        let cells: Vec<String> = row.iter().map(str::to_string).collect();
        raws.push(row_to_raw(&mapping, &cells));
    }
    Ok(raws)
}

fn csv_export_error(error: ::csv::Error) -> ExportError {
    ExportError::Container(error.to_string())
}

fn csv_import_error(error: ::csv::Error) -> ImportError {
    ImportError::Container(error.to_string())
}
