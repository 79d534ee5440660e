//! Record one sale.

use serde_json::Value;

use tillroll_core::{normalize, RawRecord, SystemDefaults};
use tillroll_warehouse::Warehouse;

use crate::cli::SaveArgs;
use crate::error::CliError;

pub fn run(warehouse: &Warehouse, args: &SaveArgs, pretty: bool) -> Result<(), CliError> {
    let raw = build_raw(args)?;

    let mut defaults = SystemDefaults::default();
    let record = normalize(&raw, &mut defaults)?;
    let stored = warehouse.insert(&record)?;

    eprintln!(
        "✓ Recorded sale #{} for '{}'",
        stored.id, stored.record.event_name
    );
    let rendered = if pretty {
        serde_json::to_string_pretty(&stored)?
    } else {
        serde_json::to_string(&stored)?
    };
    println!("{rendered}");
    Ok(())
}

/// Merge the JSON payload (if any) with individual flags, flags winning.
fn build_raw(args: &SaveArgs) -> Result<RawRecord, CliError> {
    let mut raw: RawRecord = match &args.json {
        Some(payload) => serde_json::from_str(payload)?,
        None => RawRecord::default(),
    };

    if args.event_name.is_some() {
        raw.event_name.clone_from(&args.event_name);
    }
    if args.venue_name.is_some() {
        raw.venue_name.clone_from(&args.venue_name);
    }
    if args.operating_hours.is_some() {
        raw.operating_hours.clone_from(&args.operating_hours);
    }
    if args.date_from.is_some() {
        raw.event_date_from.clone_from(&args.date_from);
    }
    if args.date_to.is_some() {
        raw.event_date_to.clone_from(&args.date_to);
    }
    if let Some(products) = &args.products {
        raw.selected_products = Some(Value::String(products.clone()));
    }
    if let Some(volume) = &args.volume {
        raw.sales_volume = Some(Value::String(volume.clone()));
    }
    if let Some(price) = &args.price {
        raw.price_per_unit = Some(Value::String(price.clone()));
    }
    if let Some(revenue) = &args.revenue {
        raw.total_revenue = Some(Value::String(revenue.clone()));
    }
    if let Some(hour) = &args.hour {
        raw.sale_hour = Some(Value::String(hour.clone()));
    }
    if args.payment.is_some() {
        raw.payment_method.clone_from(&args.payment);
    }

    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;
    use tillroll_warehouse::WarehouseConfig;

    fn empty_args() -> SaveArgs {
        SaveArgs {
            json: None,
            event_name: None,
            venue_name: None,
            operating_hours: None,
            date_from: None,
            date_to: None,
            products: None,
            volume: None,
            price: None,
            revenue: None,
            hour: None,
            payment: None,
        }
    }

    #[test]
    fn flags_override_json_payload() {
        let mut args = empty_args();
        args.json = Some(r#"{"eventName":"From JSON","venueName":"Pier"}"#.to_string());
        args.event_name = Some("From Flag".to_string());

        let raw = build_raw(&args).expect("raw");
        assert_eq!(raw.event_name.as_deref(), Some("From Flag"));
        assert_eq!(raw.venue_name.as_deref(), Some("Pier"));
    }

    #[test]
    fn numeric_flags_arrive_as_strings_for_coercion() {
        let mut args = empty_args();
        args.volume = Some("120.5".to_string());

        let raw = build_raw(&args).expect("raw");
        assert_eq!(
            raw.sales_volume,
            Some(Value::String("120.5".to_string()))
        );
    }

    #[test]
    fn malformed_json_payload_is_rejected() {
        let mut args = empty_args();
        args.json = Some("{not json".to_string());
        assert!(build_raw(&args).is_err());
    }

    #[test]
    fn saved_sale_lands_in_the_store() {
        let temp = tempdir().expect("tempdir");
        let tillroll_home = temp.path().join("tillroll-home");
        let db_path = tillroll_home.join("sales.duckdb");
        let warehouse = Warehouse::open(WarehouseConfig {
            tillroll_home,
            db_path,
            max_pool_size: 2,
        })
        .expect("warehouse open");

        let mut args = empty_args();
        args.event_name = Some("Spring Fair".to_string());
        args.venue_name = Some("Town Hall".to_string());
        args.volume = Some("120".to_string());
        args.price = Some("2.5".to_string());

        run(&warehouse, &args, false).expect("save");

        let all = warehouse.query_all().expect("query_all");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].record.event_name, "Spring Fair");
        assert_eq!(all[0].record.total_revenue, 300.0);
    }
}
