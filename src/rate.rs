//! Weak-behavior rate of a single test iteration
//!
//! A mutant is "killed" faster the more weak behaviors per second its test
//! observes. Rates are reported with three decimal places; the rounding is a
//! reporting convention shared by every downstream score, so it must be exact.

use crate::dataset::{IterationDataset, TestRunRecord};
use thiserror::Error;

/// Decimal places kept in every reported rate
pub const RATE_PRECISION: usize = 3;

/// Errors that can occur while computing a rate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RateError {
    #[error("Test `{test}` in iteration `{iteration}` has zero duration")]
    ZeroDuration { iteration: String, test: String },

    #[error("No record for test `{test}` in iteration `{iteration}`")]
    MissingRecord { iteration: String, test: String },
}

/// Result type for rate operations
pub type Result<T> = std::result::Result<T, RateError>;

/// Round to `places` decimal places, correctly rounded from the exact binary
/// value with ties to even.
///
/// Plain `(x * 1000.0).round() / 1000.0` drifts on values whose scaled form
/// is not exactly representable; the formatter works on the exact value.
pub fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", places, value).parse().unwrap_or(value)
}

/// Weak behaviors per second for one record, rounded to [`RATE_PRECISION`].
///
/// `iteration` and `test` only label the error.
pub fn record_rate(record: &TestRunRecord, iteration: &str, test: &str) -> Result<f64> {
    if record.duration_seconds == 0.0 {
        return Err(RateError::ZeroDuration {
            iteration: iteration.to_string(),
            test: test.to_string(),
        });
    }
    Ok(round_to(
        record.weak as f64 / record.duration_seconds,
        RATE_PRECISION,
    ))
}

/// Weak behaviors per second of `test` in `iteration` of `dataset`
///
/// # Example
/// ```
/// use killscope::dataset::IterationDataset;
/// use killscope::rate::weak_rate;
///
/// let dataset = IterationDataset::from_json_str(
///     r#"{"0": {"FooMutations": {"weak": 5, "durationSeconds": 2}}}"#,
/// ).unwrap();
/// assert_eq!(weak_rate(&dataset, "0", "FooMutations").unwrap(), 2.5);
/// ```
pub fn weak_rate(dataset: &IterationDataset, iteration: &str, test: &str) -> Result<f64> {
    let record = dataset
        .record(iteration, test)
        .ok_or_else(|| RateError::MissingRecord {
            iteration: iteration.to_string(),
            test: test.to_string(),
        })?;
    record_rate(record, iteration, test)
}
