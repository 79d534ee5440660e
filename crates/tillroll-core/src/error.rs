use thiserror::Error;

/// A raw record field that failed coercion while being normalized.
///
/// Single-record saves surface this to the caller immediately; bulk import
/// treats it as recoverable and skips the offending row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    /// A field with no usable default was absent.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// A date field did not parse as `YYYY-MM-DD`.
    #[error("field '{field}' is not a valid date (expected YYYY-MM-DD): '{value}'")]
    BadDate {
        field: &'static str,
        value: String,
    },

    /// A numeric field did not coerce to a number.
    #[error("field '{field}' is not numeric: '{value}'")]
    BadNumber {
        field: &'static str,
        value: String,
    },

    /// An integer field did not coerce to an integer.
    #[error("field '{field}' is not an integer: '{value}'")]
    BadInteger {
        field: &'static str,
        value: String,
    },
}

/// Aggregation was requested over zero records.
///
/// Callers surface this as a user-visible "no data" condition, not a crash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no sales records to report on")]
pub struct EmptyReport;
