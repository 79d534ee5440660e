//! # Tillroll Core
//!
//! Domain contracts and pure transformation logic for tillroll, a recorder of
//! retail/event sales transactions.
//!
//! ## Overview
//!
//! This crate provides the two logical components everything else is built
//! around, both plain functions over in-memory data:
//!
//! - **Record normalizer**: takes a loosely-typed [`RawRecord`] (a web-style
//!   payload or a parsed file row), fills missing fields with deterministic or
//!   randomized defaults, coerces types, and produces a fully-populated
//!   [`SalesRecord`] ready for persistence.
//! - **Report aggregator**: takes a collection of stored records, groups them
//!   by product and by day, computes per-row and grand-total revenue, and
//!   produces the table and chart series consumed by the export layer.
//!
//! Persistence, file codecs, and PDF assembly live in the sibling crates
//! (`tillroll-warehouse`, `tillroll-report`); this crate has no I/O.
//!
//! ## Randomness
//!
//! Missing numeric and categorical fields are filled with random defaults.
//! The random and clock sources are injected through [`DefaultsSource`] so
//! callers (and tests) can pin exact outputs; production code uses
//! [`SystemDefaults`], backed by `fastrand` and the system clock.

pub mod defaults;
pub mod domain;
pub mod error;
pub mod normalize;
pub mod report;

pub use defaults::{DefaultsSource, SystemDefaults};
pub use domain::raw::{RawRecord, COLUMNS};
pub use domain::record::{SalesRecord, StoredRecord, DATE_FORMAT, PAYMENT_METHODS};
pub use error::{EmptyReport, InvalidInput};
pub use normalize::normalize;
pub use report::{aggregate, ReportData, RowView, PLACEHOLDER_PRODUCTS};
