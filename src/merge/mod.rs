// Environment Merging under a Reproducibility Target
//
// Objective: Given the same test suite run in several environments, pick per
// test the iteration (testing configuration) that reproduces its weak
// behaviors in the most environments, then count how many (test, environment)
// pairs reach the target.
//
// Key Insight: Weak behaviors arrive roughly as a Poisson process. Observing a
// rate λ for `budget` seconds sees at least one event with probability
// 1 - exp(-λ·budget), so a reproducibility target p needs
// λ ≥ ceil(-ln(1 - p)) / budget.
//
// The search is two-pass: choose the best iteration per test first, then
// recount every environment against that single choice.

mod search;
mod sweep;
mod threshold;

pub use search::{merge_test_environments, EnvironmentCandidate, MergeOutcome, NO_POSITIVE_RATE};
pub use sweep::{budget_sweep, SweepPoint};
pub use threshold::{ceiling_rate, parse_budget};

use crate::rate::RateError;
use thiserror::Error;

/// Errors that can occur while merging environments
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MergeError {
    #[error(transparent)]
    Rate(#[from] RateError),

    #[error("Reproducibility must be in (0, 1), got {0}")]
    InvalidReproducibility(f64),

    #[error("Invalid budget `{0}`: expected a positive number of seconds or a fraction like 1/1024")]
    InvalidBudget(String),

    #[error("No environments to merge")]
    NoEnvironments,

    #[error("Device `{0}` has no iterations")]
    NoIterations(String),

    #[error("Device `{device}` does not share the iteration ids of `{reference}`")]
    MismatchedIterations { device: String, reference: String },

    #[error(
        "Test `{test}` is not present in every environment (device `{device}`, iteration `{iteration}`)"
    )]
    MismatchedTests {
        device: String,
        iteration: String,
        test: String,
    },
}

/// Result type for merge operations
pub type Result<T> = std::result::Result<T, MergeError>;

#[cfg(test)]
mod tests;
