//! The persisted sales record.

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

/// The calendar-date format used everywhere records cross a boundary
/// (wire payloads, file rows, the store).
pub const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(iso_date, Date, DATE_FORMAT);

/// Payment methods picked from when the caller supplies none.
///
/// Caller-supplied values are stored verbatim and never checked against this
/// set; it only scopes the random default.
pub const PAYMENT_METHODS: [&str; 3] = ["Cash", "Card", "Contactless"];

/// One fully-populated sales transaction for an event/venue.
///
/// Produced by [`normalize`](crate::normalize) and immutable once persisted;
/// the store assigns the id (see [`StoredRecord`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub event_name: String,
    pub venue_name: String,
    pub operating_hours: String,
    #[serde(with = "iso_date")]
    pub event_date_from: Date,
    #[serde(with = "iso_date")]
    pub event_date_to: Date,
    /// Always valid JSON array text, even when the source was a
    /// comma-separated string.
    pub products_sold: String,
    pub sales_volume: f64,
    pub price_per_unit: f64,
    pub total_revenue: f64,
    pub sale_hour: i64,
    pub payment_method: String,
}

impl SalesRecord {
    /// The stored product list, parsed back out of its JSON text.
    ///
    /// Corrupt text yields an empty list rather than an error; display code
    /// substitutes placeholders for empty lists anyway.
    #[must_use]
    pub fn products(&self) -> Vec<String> {
        serde_json::from_str(&self.products_sold).unwrap_or_default()
    }
}

/// A [`SalesRecord`] as returned by the store, with its assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: i64,
    #[serde(flatten)]
    pub record: SalesRecord,
}
