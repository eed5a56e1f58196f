// Mutation Score Aggregation
//
// Objective: Turn per-iteration weak-behavior observations into mutation
// scores per mutant category.
//
// A test's score is its best-case kill rate: the highest rate any iteration
// observed. A mutant is "caught" when that best rate is strictly positive.
// Scores roll up per category, per device, and across devices of an
// environment.
//
// Implementation:
// - Exact (rounded f64) averages for every reported score
// - trueno (crates.io) SIMD vectors for the informational rate distribution
//   summaries only

mod aggregate;
mod device;
mod summary;

pub use aggregate::{per_test_stats, BestRate, CategoryScore, MutationScores, TestScoreReport};
pub use device::{device_scores, environment_scores, DeviceScoreReport};
pub use summary::RateSummary;

use crate::rate::RateError;
use thiserror::Error;

/// Errors that can occur during score aggregation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error(transparent)]
    Rate(#[from] RateError),

    #[error("No tests in category `{0}`: every mutant category needs at least one test")]
    EmptyCategory(String),

    #[error("No device datasets to aggregate")]
    NoDevices,
}

/// Result type for scoring operations
pub type Result<T> = std::result::Result<T, ScoreError>;
