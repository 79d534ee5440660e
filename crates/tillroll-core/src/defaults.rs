//! Injectable source of clock readings and random draws.
//!
//! The normalizer and aggregator fill gaps with "today", "current hour", or
//! uniform random values. Routing those through a trait keeps the core logic
//! deterministic under test while production code stays on `fastrand` and the
//! system clock.

use time::{Date, OffsetDateTime};

/// Supplies the current date/hour and uniform random draws.
pub trait DefaultsSource {
    /// Current calendar date.
    fn today(&mut self) -> Date;

    /// Current hour of day, 0-23.
    fn current_hour(&mut self) -> i64;

    /// Uniform random value in `[lower, upper]`.
    fn uniform(&mut self, lower: f64, upper: f64) -> f64;

    /// Uniform random index in `0..len`.
    fn pick(&mut self, len: usize) -> usize;
}

/// Production [`DefaultsSource`]: UTC clock plus `fastrand`.
///
/// The generator is not seeded and not cryptographically secure; defaulted
/// fields only need realistic-looking filler values.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDefaults;

impl DefaultsSource for SystemDefaults {
    fn today(&mut self) -> Date {
        OffsetDateTime::now_utc().date()
    }

    fn current_hour(&mut self) -> i64 {
        i64::from(OffsetDateTime::now_utc().hour())
    }

    fn uniform(&mut self, lower: f64, upper: f64) -> f64 {
        lower + fastrand::f64() * (upper - lower)
    }

    fn pick(&mut self, len: usize) -> usize {
        fastrand::usize(0..len)
    }
}

/// Round to two decimal places, the precision used for monetary fields.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_truncates_to_cents() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(9.876), 9.88);
        assert_eq!(round2(25.0), 25.0);
    }

    #[test]
    fn system_uniform_stays_in_range() {
        let mut defaults = SystemDefaults;
        for _ in 0..100 {
            let value = defaults.uniform(50.0, 500.0);
            assert!((50.0..=500.0).contains(&value), "out of range: {value}");
        }
    }

    #[test]
    fn system_pick_stays_in_range() {
        let mut defaults = SystemDefaults;
        for _ in 0..100 {
            assert!(defaults.pick(3) < 3);
        }
    }
}
