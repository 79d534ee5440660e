//! Record normalization: defaulting and type coercion for inbound records.
//!
//! Fields are resolved independently, in a fixed order; each default is
//! computed only from already-available values. The two exceptions are the
//! date bounds, which are defaulted together from the same instant, and
//! `total_revenue`, which (when absent) is derived from the final volume and
//! price.

use serde_json::Value;
use time::Date;

use crate::defaults::{round2, DefaultsSource};
use crate::domain::raw::RawRecord;
use crate::domain::record::{SalesRecord, DATE_FORMAT, PAYMENT_METHODS};
use crate::error::InvalidInput;

/// Normalize one raw record into a persistable [`SalesRecord`].
///
/// # Errors
/// Returns [`InvalidInput`] when a required field is absent or a supplied
/// field fails coercion. No partial record is produced.
pub fn normalize(
    raw: &RawRecord,
    defaults: &mut dyn DefaultsSource,
) -> Result<SalesRecord, InvalidInput> {
    let event_name = required_text("eventName", &raw.event_name)?;
    let venue_name = required_text("venueName", &raw.venue_name)?;

    let operating_hours = match text(&raw.operating_hours) {
        Some(hours) => hours.to_string(),
        None => "12:00 PM - 11:00 PM".to_string(),
    };

    // Both bounds present: parse both, rejecting the record if either is bad.
    // Either bound absent: default both to today so the range stays well-formed.
    let (event_date_from, event_date_to) =
        match (text(&raw.event_date_from), text(&raw.event_date_to)) {
            (Some(from), Some(to)) => (
                parse_date("eventDateFrom", from)?,
                parse_date("eventDateTo", to)?,
            ),
            _ => {
                let today = defaults.today();
                (today, today)
            }
        };

    let sale_hour = match value(&raw.sale_hour) {
        Some(supplied) => coerce_integer("saleHour", supplied)?,
        None => defaults.current_hour(),
    };

    let sales_volume = match value(&raw.sales_volume) {
        Some(supplied) => coerce_number("salesVolume", supplied)?,
        None => round2(defaults.uniform(50.0, 500.0)),
    };

    let price_per_unit = match value(&raw.price_per_unit) {
        Some(supplied) => coerce_number("pricePerUnit", supplied)?,
        None => round2(defaults.uniform(1.0, 10.0)),
    };

    // A caller-supplied revenue is trusted as-is, never recomputed.
    let total_revenue = match value(&raw.total_revenue) {
        Some(supplied) => coerce_number("totalRevenue", supplied)?,
        None => round2(sales_volume * price_per_unit),
    };

    let payment_method = match text(&raw.payment_method) {
        Some(method) => method.to_string(),
        None => PAYMENT_METHODS[defaults.pick(PAYMENT_METHODS.len())].to_string(),
    };

    let products = resolve_products(&raw.selected_products);
    let products_sold =
        serde_json::to_string(&products).unwrap_or_else(|_| "[]".to_string());

    Ok(SalesRecord {
        event_name,
        venue_name,
        operating_hours,
        event_date_from,
        event_date_to,
        products_sold,
        sales_volume,
        price_per_unit,
        total_revenue,
        sale_hour,
        payment_method,
    })
}

/// Resolve the product list from a structured list, JSON array text, or a
/// comma-separated string.
fn resolve_products(supplied: &Option<Value>) -> Vec<String> {
    match supplied {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(product_name).collect(),
        Some(Value::String(text)) => {
            if text.trim().is_empty() {
                return Vec::new();
            }
            match serde_json::from_str::<Value>(text) {
                Ok(Value::Array(items)) => items.iter().map(product_name).collect(),
                _ => text.split(',').map(|piece| piece.trim().to_string()).collect(),
            }
        }
        Some(other) => vec![product_name(other)],
    }
}

fn product_name(item: &Value) -> String {
    match item {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    }
}

/// A text field counts as present only when it carries non-whitespace
/// content; blank strings are treated the same as a missing key.
fn text(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}

fn required_text(name: &'static str, field: &Option<String>) -> Result<String, InvalidInput> {
    text(field)
        .map(str::to_string)
        .ok_or(InvalidInput::MissingField(name))
}

/// A loosely-typed field counts as present unless it is missing, null, or a
/// blank string.
fn value(field: &Option<Value>) -> Option<&Value> {
    match field {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) if text.trim().is_empty() => None,
        Some(supplied) => Some(supplied),
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<Date, InvalidInput> {
    Date::parse(value.trim(), DATE_FORMAT).map_err(|_| InvalidInput::BadDate {
        field,
        value: value.to_string(),
    })
}

fn coerce_number(field: &'static str, supplied: &Value) -> Result<f64, InvalidInput> {
    match supplied {
        Value::Number(number) => number.as_f64().ok_or_else(|| InvalidInput::BadNumber {
            field,
            value: number.to_string(),
        }),
        Value::String(text) => text.trim().parse().map_err(|_| InvalidInput::BadNumber {
            field,
            value: text.clone(),
        }),
        other => Err(InvalidInput::BadNumber {
            field,
            value: other.to_string(),
        }),
    }
}

fn coerce_integer(field: &'static str, supplied: &Value) -> Result<i64, InvalidInput> {
    match supplied {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64))
            .ok_or_else(|| InvalidInput::BadInteger {
                field,
                value: number.to_string(),
            }),
        Value::String(text) => text.trim().parse().map_err(|_| InvalidInput::BadInteger {
            field,
            value: text.clone(),
        }),
        other => Err(InvalidInput::BadInteger {
            field,
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    /// Scripted defaults: fixed clock, queued random draws.
    struct Scripted {
        today: Date,
        hour: i64,
        draws: Vec<f64>,
        picks: Vec<usize>,
    }

    impl Scripted {
        fn new() -> Self {
            Self {
                today: date!(2024 - 06 - 15),
                hour: 14,
                draws: Vec::new(),
                picks: Vec::new(),
            }
        }
    }

    impl DefaultsSource for Scripted {
        fn today(&mut self) -> Date {
            self.today
        }

        fn current_hour(&mut self) -> i64 {
            self.hour
        }

        fn uniform(&mut self, lower: f64, _upper: f64) -> f64 {
            if self.draws.is_empty() {
                lower
            } else {
                self.draws.remove(0)
            }
        }

        fn pick(&mut self, _len: usize) -> usize {
            if self.picks.is_empty() {
                0
            } else {
                self.picks.remove(0)
            }
        }
    }

    fn minimal() -> RawRecord {
        RawRecord {
            event_name: Some("Spring Fair".to_string()),
            venue_name: Some("Town Hall".to_string()),
            ..RawRecord::default()
        }
    }

    #[test]
    fn missing_event_name_is_rejected() {
        let raw = RawRecord {
            venue_name: Some("Town Hall".to_string()),
            ..RawRecord::default()
        };
        let error = normalize(&raw, &mut Scripted::new()).expect_err("must reject");
        assert_eq!(error, InvalidInput::MissingField("eventName"));
    }

    #[test]
    fn absent_operating_hours_gets_fixed_default() {
        let record = normalize(&minimal(), &mut Scripted::new()).expect("normalize");
        assert_eq!(record.operating_hours, "12:00 PM - 11:00 PM");
    }

    #[test]
    fn missing_either_date_defaults_both_to_today() {
        let mut raw = minimal();
        raw.event_date_from = Some("2024-01-01".to_string());
        // eventDateTo absent: the supplied bound is ignored, both become today.
        let record = normalize(&raw, &mut Scripted::new()).expect("normalize");
        assert_eq!(record.event_date_from, date!(2024 - 06 - 15));
        assert_eq!(record.event_date_to, date!(2024 - 06 - 15));
    }

    #[test]
    fn unparseable_date_from_is_rejected_when_both_present() {
        let mut raw = minimal();
        raw.event_date_from = Some("01/03/2024".to_string());
        raw.event_date_to = Some("2024-03-02".to_string());
        let error = normalize(&raw, &mut Scripted::new()).expect_err("must reject");
        assert!(matches!(
            error,
            InvalidInput::BadDate {
                field: "eventDateFrom",
                ..
            }
        ));
    }

    #[test]
    fn supplied_dates_are_parsed() {
        let mut raw = minimal();
        raw.event_date_from = Some("2024-03-01".to_string());
        raw.event_date_to = Some("2024-03-02".to_string());
        let record = normalize(&raw, &mut Scripted::new()).expect("normalize");
        assert_eq!(record.event_date_from, date!(2024 - 03 - 01));
        assert_eq!(record.event_date_to, date!(2024 - 03 - 02));
    }

    #[test]
    fn absent_revenue_is_volume_times_price() {
        let mut raw = minimal();
        raw.sales_volume = Some(json!(10));
        raw.price_per_unit = Some(json!(2.5));
        let record = normalize(&raw, &mut Scripted::new()).expect("normalize");
        assert_eq!(record.total_revenue, 25.0);
    }

    #[test]
    fn absent_revenue_uses_defaulted_volume_and_price() {
        let mut scripted = Scripted::new();
        scripted.draws = vec![120.0, 4.0];
        let record = normalize(&minimal(), &mut scripted).expect("normalize");
        assert_eq!(record.sales_volume, 120.0);
        assert_eq!(record.price_per_unit, 4.0);
        assert_eq!(record.total_revenue, 480.0);
    }

    #[test]
    fn supplied_revenue_is_trusted_verbatim() {
        let mut raw = minimal();
        raw.sales_volume = Some(json!(10));
        raw.price_per_unit = Some(json!(2.5));
        raw.total_revenue = Some(json!(999.99));
        let record = normalize(&raw, &mut Scripted::new()).expect("normalize");
        assert_eq!(record.total_revenue, 999.99);
    }

    #[test]
    fn non_numeric_volume_is_rejected() {
        let mut raw = minimal();
        raw.sales_volume = Some(json!("lots"));
        let error = normalize(&raw, &mut Scripted::new()).expect_err("must reject");
        assert!(matches!(
            error,
            InvalidInput::BadNumber {
                field: "salesVolume",
                ..
            }
        ));
    }

    #[test]
    fn non_integer_hour_is_rejected() {
        let mut raw = minimal();
        raw.sale_hour = Some(json!("noon"));
        let error = normalize(&raw, &mut Scripted::new()).expect_err("must reject");
        assert!(matches!(
            error,
            InvalidInput::BadInteger {
                field: "saleHour",
                ..
            }
        ));
    }

    #[test]
    fn absent_hour_uses_current_hour() {
        let record = normalize(&minimal(), &mut Scripted::new()).expect("normalize");
        assert_eq!(record.sale_hour, 14);
    }

    #[test]
    fn out_of_range_hour_is_stored_verbatim() {
        let mut raw = minimal();
        raw.sale_hour = Some(json!(25));
        let record = normalize(&raw, &mut Scripted::new()).expect("normalize");
        assert_eq!(record.sale_hour, 25);
    }

    #[test]
    fn unknown_payment_method_is_stored_verbatim() {
        let mut raw = minimal();
        raw.payment_method = Some("Barter".to_string());
        let record = normalize(&raw, &mut Scripted::new()).expect("normalize");
        assert_eq!(record.payment_method, "Barter");
    }

    #[test]
    fn absent_payment_method_is_picked_from_known_set() {
        let mut scripted = Scripted::new();
        scripted.picks = vec![2];
        let record = normalize(&minimal(), &mut scripted).expect("normalize");
        assert_eq!(record.payment_method, "Contactless");
    }

    #[test]
    fn structured_product_list_is_serialized_as_json() {
        let mut raw = minimal();
        raw.selected_products = Some(json!(["Fosters", "Amstel"]));
        let record = normalize(&raw, &mut Scripted::new()).expect("normalize");
        assert_eq!(record.products_sold, r#"["Fosters","Amstel"]"#);
    }

    #[test]
    fn json_array_text_is_parsed() {
        let mut raw = minimal();
        raw.selected_products = Some(json!(r#"["Heineken","Guinness"]"#));
        let record = normalize(&raw, &mut Scripted::new()).expect("normalize");
        assert_eq!(record.products_sold, r#"["Heineken","Guinness"]"#);
    }

    #[test]
    fn comma_separated_text_is_split_and_trimmed() {
        let mut raw = minimal();
        raw.selected_products = Some(json!("Fosters ,  Amstel,Cruzcampo"));
        let record = normalize(&raw, &mut Scripted::new()).expect("normalize");
        assert_eq!(record.products_sold, r#"["Fosters","Amstel","Cruzcampo"]"#);
    }

    #[test]
    fn absent_products_become_empty_array_text() {
        let record = normalize(&minimal(), &mut Scripted::new()).expect("normalize");
        assert_eq!(record.products_sold, "[]");
    }

    #[test]
    fn normalize_is_idempotent_on_fully_supplied_records() {
        let mut raw = minimal();
        raw.operating_hours = Some("10:00 AM - 6:00 PM".to_string());
        raw.event_date_from = Some("2024-03-01".to_string());
        raw.event_date_to = Some("2024-03-02".to_string());
        raw.selected_products = Some(json!(["Fosters"]));
        raw.sales_volume = Some(json!(10.0));
        raw.price_per_unit = Some(json!(2.5));
        raw.total_revenue = Some(json!(25.0));
        raw.sale_hour = Some(json!(18));
        raw.payment_method = Some("Card".to_string());

        let first = normalize(&raw, &mut Scripted::new()).expect("first pass");

        // Feed the output back through as a fully-supplied record.
        let resupplied = RawRecord {
            event_name: Some(first.event_name.clone()),
            venue_name: Some(first.venue_name.clone()),
            operating_hours: Some(first.operating_hours.clone()),
            event_date_from: Some("2024-03-01".to_string()),
            event_date_to: Some("2024-03-02".to_string()),
            selected_products: Some(json!(first.products_sold.clone())),
            sales_volume: Some(json!(first.sales_volume)),
            price_per_unit: Some(json!(first.price_per_unit)),
            total_revenue: Some(json!(first.total_revenue)),
            sale_hour: Some(json!(first.sale_hour)),
            payment_method: Some(first.payment_method.clone()),
        };
        let second = normalize(&resupplied, &mut Scripted::new()).expect("second pass");
        assert_eq!(first, second);
    }
}
