//! Loosely-typed inbound record, before normalization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The column list shared by file import and export, in wire order.
///
/// Import requires every one of these in the header row; export emits them in
/// exactly this order.
pub const COLUMNS: [&str; 11] = [
    "eventName",
    "eventDateFrom",
    "eventDateTo",
    "venueName",
    "operatingHours",
    "selectedProducts",
    "salesVolume",
    "pricePerUnit",
    "totalRevenue",
    "saleHour",
    "paymentMethod",
];

/// One inbound record as received from a web-style payload or a file row.
///
/// Every field is optional; numeric-ish fields are [`Value`] so JSON numbers
/// and file-row strings both reach the normalizer's coercion untouched.
/// `None`, JSON `null`, and empty strings all count as "absent".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRecord {
    pub event_name: Option<String>,
    pub venue_name: Option<String>,
    pub operating_hours: Option<String>,
    pub event_date_from: Option<String>,
    pub event_date_to: Option<String>,
    /// Either a structured list or (for file rows) a string holding JSON
    /// array text or a comma-separated list.
    pub selected_products: Option<Value>,
    pub sales_volume: Option<Value>,
    pub price_per_unit: Option<Value>,
    pub total_revenue: Option<Value>,
    pub sale_hour: Option<Value>,
    pub payment_method: Option<String>,
}

impl RawRecord {
    /// Set a field from a file cell, addressed by its wire column name.
    ///
    /// Unknown columns are ignored, so files with extra columns import fine.
    pub fn set_column(&mut self, column: &str, value: &str) {
        match column {
            "eventName" => self.event_name = Some(value.to_string()),
            "venueName" => self.venue_name = Some(value.to_string()),
            "operatingHours" => self.operating_hours = Some(value.to_string()),
            "eventDateFrom" => self.event_date_from = Some(value.to_string()),
            "eventDateTo" => self.event_date_to = Some(value.to_string()),
            "selectedProducts" => {
                self.selected_products = Some(Value::String(value.to_string()));
            }
            "salesVolume" => self.sales_volume = Some(Value::String(value.to_string())),
            "pricePerUnit" => self.price_per_unit = Some(Value::String(value.to_string())),
            "totalRevenue" => self.total_revenue = Some(Value::String(value.to_string())),
            "saleHour" => self.sale_hour = Some(Value::String(value.to_string())),
            "paymentMethod" => self.payment_method = Some(value.to_string()),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_payload() {
        let raw: RawRecord = serde_json::from_str(
            r#"{"eventName":"Fair","venueName":"Hall","salesVolume":12.5,"saleHour":"9"}"#,
        )
        .expect("deserialize");
        assert_eq!(raw.event_name.as_deref(), Some("Fair"));
        assert_eq!(raw.sales_volume, Some(Value::from(12.5)));
        assert_eq!(raw.sale_hour, Some(Value::String("9".to_string())));
        assert!(raw.operating_hours.is_none());
    }

    #[test]
    fn set_column_routes_by_wire_name() {
        let mut raw = RawRecord::default();
        raw.set_column("eventName", "Fair");
        raw.set_column("pricePerUnit", "2.5");
        raw.set_column("somethingElse", "ignored");
        assert_eq!(raw.event_name.as_deref(), Some("Fair"));
        assert_eq!(raw.price_per_unit, Some(Value::String("2.5".to_string())));
    }
}
