//! Print stored records as JSON.

use tillroll_warehouse::Warehouse;

use crate::error::CliError;

pub fn run(warehouse: &Warehouse, pretty: bool) -> Result<(), CliError> {
    let records = warehouse.query_all()?;
    let rendered = if pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    println!("{rendered}");
    Ok(())
}
