//! Report aggregation over a set of sales records.
//!
//! Aggregation is display-oriented: empty product lists and zero quantities
//! are substituted with placeholders before any arithmetic happens, so the
//! published figures never show a blank product or a zero line.

use std::collections::BTreeMap;

use time::Date;

use crate::defaults::{round2, DefaultsSource};
use crate::domain::record::SalesRecord;
use crate::error::EmptyReport;

/// Stand-in products drawn from when a record carries no product list.
pub const PLACEHOLDER_PRODUCTS: [&str; 6] = [
    "Fosters",
    "Amstel",
    "Heineken",
    "Cruzcampo",
    "Budweiser",
    "Guinness",
];

/// One record's contribution to the report, after placeholder substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub event_name: String,
    pub date: Date,
    pub products: Vec<String>,
    pub volume: f64,
    pub price: f64,
}

impl RowView {
    /// Row revenue as displayed: recomputed from volume and price, not read
    /// from the stored total.
    #[must_use]
    pub fn revenue(&self) -> f64 {
        round2(self.volume * self.price)
    }
}

/// Aggregated figures for a report run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportData {
    /// Rows in the input order of the records they came from.
    pub rows: Vec<RowView>,
    /// Total volume per product, keyed and iterated in product-name order.
    pub product_volume: BTreeMap<String, f64>,
    /// Revenue per event start date, ascending.
    pub daily_revenue: BTreeMap<Date, f64>,
    pub grand_total: f64,
}

impl ReportData {
    /// Pie chart series over product volumes.
    ///
    /// When every slice is zero the chart would be undrawable, so a single
    /// "No Data" slice of weight 1 is substituted.
    #[must_use]
    pub fn pie_series(&self) -> Vec<(String, f64)> {
        let total: f64 = self.product_volume.values().sum();
        if total == 0.0 {
            return vec![("No Data".to_string(), 1.0)];
        }
        self.product_volume
            .iter()
            .map(|(name, volume)| (name.clone(), *volume))
            .collect()
    }
}

/// Aggregate records into report figures.
///
/// # Errors
/// Returns [`EmptyReport`] when there is nothing to report on; callers choose
/// how to surface that.
pub fn aggregate<'a, I>(
    records: I,
    defaults: &mut dyn DefaultsSource,
) -> Result<ReportData, EmptyReport>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let records: Vec<&SalesRecord> = records.into_iter().collect();
    if records.is_empty() {
        return Err(EmptyReport);
    }

    let mut rows = Vec::with_capacity(records.len());
    let mut product_volume: BTreeMap<String, f64> = BTreeMap::new();
    let mut daily_revenue: BTreeMap<Date, f64> = BTreeMap::new();
    let mut grand_total = 0.0;

    for record in records {
        let mut products = record.products();
        if products.is_empty() {
            // Display-only stand-in; the stored record keeps its empty list.
            let pick = defaults.pick(PLACEHOLDER_PRODUCTS.len());
            products = vec![PLACEHOLDER_PRODUCTS[pick].to_string()];
        }

        let volume = if record.sales_volume == 0.0 {
            round2(defaults.uniform(50.0, 500.0))
        } else {
            record.sales_volume
        };
        let price = if record.price_per_unit == 0.0 {
            round2(defaults.uniform(1.0, 10.0))
        } else {
            record.price_per_unit
        };

        let row = RowView {
            event_name: record.event_name.clone(),
            date: record.event_date_from,
            products,
            volume,
            price,
        };
        let revenue = row.revenue();

        // The whole row volume is credited to the first listed product.
        if let Some(first) = row.products.first() {
            *product_volume.entry(first.clone()).or_insert(0.0) += row.volume;
        }
        *daily_revenue.entry(row.date).or_insert(0.0) += revenue;
        grand_total += revenue;

        rows.push(row);
    }

    Ok(ReportData {
        rows,
        product_volume,
        daily_revenue,
        grand_total: round2(grand_total),
    })
}
