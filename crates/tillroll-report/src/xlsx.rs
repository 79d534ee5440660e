//! XLSX import and export.
//!
//! Export goes through `umya-spreadsheet` (writing), import through
//! `calamine` (reading); neither library covers both directions well.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use time::{Date, Duration};

use tillroll_core::{RawRecord, StoredRecord, COLUMNS, DATE_FORMAT};

use crate::error::{ExportError, ImportError};
use crate::{row_to_raw, validate_header, wire_cells};

const COLUMN_LETTERS: [&str; 11] = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K"];

/// Write records to an XLSX file with the wire header row.
///
/// # Errors
/// Returns an error if the workbook cannot be assembled or written.
pub fn export_records(path: &Path, records: &[StoredRecord]) -> Result<(), ExportError> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_mut(&0)
        .ok_or_else(|| ExportError::Container("new workbook has no sheet".to_string()))?;
    sheet.set_name("Sales Report");

    for (index, column) in COLUMNS.iter().enumerate() {
        let col = u32::try_from(index).unwrap_or(0) + 1;
        sheet.get_cell_mut((col, 1)).set_value(*column);
    }

    for (row_index, stored) in records.iter().enumerate() {
        let row = u32::try_from(row_index).unwrap_or(0) + 2;
        let cells = wire_cells(&stored.record)?;
        for (index, cell) in cells.iter().enumerate() {
            let col = u32::try_from(index).unwrap_or(0) + 1;
            sheet.get_cell_mut((col, row)).set_value(cell);
        }
    }

    for letter in COLUMN_LETTERS {
        sheet.get_column_dimension_mut(letter).set_width(20.0);
    }

    umya_spreadsheet::writer::xlsx::write(&book, path)
        .map_err(|error| ExportError::Container(error.to_string()))
}

/// Read the data rows of the first sheet of a workbook as raw records.
///
/// # Errors
/// Returns an error if the workbook cannot be decoded or its header row lacks
/// a required column.
pub fn read_rows(path: &Path) -> Result<Vec<RawRecord>, ImportError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|error| ImportError::Container(error.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::Container("workbook has no sheets".to_string()))?
        .map_err(|error| ImportError::Container(error.to_string()))?;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| ImportError::MissingColumns(
            COLUMNS.iter().map(|column| column.to_string()).collect(),
        ))?
        .iter()
        .map(cell_to_string)
        .collect();
    let mapping = validate_header(&header)?;

    let mut raws = Vec::new();
    for row in rows {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        if cells.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        raws.push(row_to_raw(&mapping, &cells));
    }
    Ok(raws)
}

/// Render one spreadsheet cell as the string the normalizer will coerce.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        Data::Float(value) => value.to_string(),
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => excel_serial_to_iso(value.as_f64()),
        Data::DateTimeIso(text) | Data::DurationIso(text) => text.clone(),
        Data::Error(error) => format!("{error:?}"),
    }
}

/// Convert an Excel serial date to ISO text. Serial day 0 is 1899-12-30.
fn excel_serial_to_iso(serial: f64) -> String {
    let Ok(epoch) = Date::from_calendar_date(1899, time::Month::December, 30) else {
        return serial.to_string();
    };
    let days = serial.trunc() as i64;
    let date = epoch.saturating_add(Duration::days(days));
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| serial.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tillroll_core::SalesRecord;
    use time::macros::date;

    fn sample(name: &str) -> StoredRecord {
        StoredRecord {
            id: 1,
            record: SalesRecord {
                event_name: name.to_string(),
                venue_name: "Town Hall".to_string(),
                operating_hours: "12:00 PM - 11:00 PM".to_string(),
                event_date_from: date!(2024 - 03 - 01),
                event_date_to: date!(2024 - 03 - 02),
                products_sold: r#"["Fosters"]"#.to_string(),
                sales_volume: 120.5,
                price_per_unit: 2.75,
                total_revenue: 331.38,
                sale_hour: 18,
                payment_method: "Card".to_string(),
            },
        }
    }

    #[test]
    fn exported_workbook_reads_back_row_for_row() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("sales.xlsx");

        export_records(&path, &[sample("Fair"), sample("Gala")]).expect("export");
        let raws = read_rows(&path).expect("read");

        assert_eq!(raws.len(), 2);
        assert_eq!(raws[0].event_name.as_deref(), Some("Fair"));
        assert_eq!(raws[1].event_name.as_deref(), Some("Gala"));
        assert_eq!(raws[0].event_date_from.as_deref(), Some("2024-03-01"));
        assert_eq!(raws[0].payment_method.as_deref(), Some("Card"));
    }

    #[test]
    fn empty_workbook_rows_are_skipped() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("sparse.xlsx");

        export_records(&path, &[sample("Fair")]).expect("export");
        let raws = read_rows(&path).expect("read");
        assert_eq!(raws.len(), 1);
    }

    #[test]
    fn serial_dates_convert_to_iso_text() {
        // 45352 is 2024-03-01 in the 1900 date system.
        assert_eq!(excel_serial_to_iso(45352.0), "2024-03-01");
    }
}
