// Best iteration per test across environments, then a reproducibility recount

use super::threshold::ceiling_rate;
use super::{MergeError, Result};
use crate::dataset::DeviceStats;
use crate::rate::weak_rate;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, trace};

/// Minimum positive rate recorded when no environment observed any weak
/// behavior
pub const NO_POSITIVE_RATE: f64 = f64::MAX;

/// How well one iteration reproduces one test across all environments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentCandidate {
    /// Environments whose rate reaches the ceiling rate
    pub reproducible_count: usize,
    /// Smallest strictly positive rate across environments
    pub min_positive_rate: f64,
    pub source_iteration: String,
}

impl EnvironmentCandidate {
    /// More reproducing environments wins; on a tie, the larger minimum
    /// positive rate wins. Full ties keep the incumbent.
    fn beats(&self, incumbent: &EnvironmentCandidate) -> bool {
        self.reproducible_count > incumbent.reproducible_count
            || (self.reproducible_count == incumbent.reproducible_count
                && self.min_positive_rate > incumbent.min_positive_rate)
    }
}

/// Result of [`merge_test_environments`]
#[derive(Debug, Clone, Serialize)]
pub struct MergeOutcome {
    /// Required weak behaviors per second
    pub ceiling_rate: f64,
    /// (test, environment) pairs reproducible at each test's chosen iteration
    pub reproducible: usize,
    pub num_tests: usize,
    pub num_environments: usize,
    /// Winning iteration per test
    pub chosen: IndexMap<String, EnvironmentCandidate>,
}

impl MergeOutcome {
    /// Upper bound on `reproducible`
    pub fn max_pairs(&self) -> usize {
        self.num_tests * self.num_environments
    }

    /// `reproducible` as a percentage of all (test, environment) pairs
    pub fn percent(&self) -> f64 {
        if self.max_pairs() == 0 {
            return 0.0;
        }
        self.reproducible as f64 / self.max_pairs() as f64 * 100.0
    }
}

/// Check that every environment has the reference iteration ids and, in each
/// iteration, exactly the reference tests. Returns `(iterations, tests)` of
/// the reference (first) environment; tests come from its first iteration.
fn shared_keys(all_stats: &[DeviceStats]) -> Result<(Vec<&str>, Vec<&str>)> {
    let reference = all_stats.first().ok_or(MergeError::NoEnvironments)?;
    let iterations: Vec<&str> = reference.data.iteration_ids().collect();
    let tests: Vec<&str> = match iterations.first() {
        Some(first) => reference
            .data
            .iteration(first)
            .map(|observed| observed.keys().map(String::as_str).collect())
            .unwrap_or_default(),
        None => return Err(MergeError::NoIterations(reference.device.clone())),
    };

    for stats in all_stats {
        let same_iterations = stats.data.num_iterations() == iterations.len()
            && iterations.iter().all(|id| stats.data.iteration(id).is_some());
        if !same_iterations {
            return Err(MergeError::MismatchedIterations {
                device: stats.device.clone(),
                reference: reference.device.clone(),
            });
        }

        for (iteration, observed) in stats.data.iterations() {
            let mismatch = tests
                .iter()
                .find(|test| !observed.contains_key(**test))
                .copied()
                .or_else(|| {
                    observed
                        .keys()
                        .map(String::as_str)
                        .find(|test| !tests.contains(test))
                });
            if let Some(test) = mismatch {
                return Err(MergeError::MismatchedTests {
                    device: stats.device.clone(),
                    iteration: iteration.to_string(),
                    test: test.to_string(),
                });
            }
        }
    }

    Ok((iterations, tests))
}

/// Score one (iteration, test) across every environment
fn evaluate(
    all_stats: &[DeviceStats],
    iteration: &str,
    test: &str,
    ceiling: f64,
) -> Result<EnvironmentCandidate> {
    let mut reproducible_count = 0;
    let mut min_positive_rate = NO_POSITIVE_RATE;
    for stats in all_stats {
        let rate = weak_rate(&stats.data, iteration, test)?;
        if rate >= ceiling {
            reproducible_count += 1;
        }
        if rate > 0.0 && rate < min_positive_rate {
            min_positive_rate = rate;
        }
    }
    Ok(EnvironmentCandidate {
        reproducible_count,
        min_positive_rate,
        source_iteration: iteration.to_string(),
    })
}

/// Merge environments: choose the most reproducible iteration per test and
/// count the (test, environment) pairs that reach the reproducibility target
/// within `budget` seconds.
///
/// All environments must share iteration ids and test names.
pub fn merge_test_environments(
    all_stats: &[DeviceStats],
    reproducibility: f64,
    budget: f64,
) -> Result<MergeOutcome> {
    let ceiling = ceiling_rate(reproducibility, budget)?;
    let (iterations, tests) = shared_keys(all_stats)?;
    debug!(
        reproducibility,
        budget,
        ceiling_rate = ceiling,
        environments = all_stats.len(),
        tests = tests.len(),
        "merging environments"
    );

    let mut chosen = IndexMap::with_capacity(tests.len());
    for test in &tests {
        let mut best: Option<EnvironmentCandidate> = None;
        for iteration in &iterations {
            let candidate = evaluate(all_stats, iteration, test, ceiling)?;
            let replace = match &best {
                Some(incumbent) => candidate.beats(incumbent),
                None => true,
            };
            if replace {
                best = Some(candidate);
            }
        }
        if let Some(best) = best {
            trace!(
                test,
                iteration = %best.source_iteration,
                reproducible = best.reproducible_count,
                "chose iteration"
            );
            chosen.insert(test.to_string(), best);
        }
    }

    let mut reproducible = 0;
    for (test, candidate) in &chosen {
        for stats in all_stats {
            if weak_rate(&stats.data, &candidate.source_iteration, test)? >= ceiling {
                reproducible += 1;
            }
        }
    }

    Ok(MergeOutcome {
        ceiling_rate: ceiling,
        reproducible,
        num_tests: tests.len(),
        num_environments: all_stats.len(),
        chosen,
    })
}
