// Per-test best rates and per-category mutation scores for one dataset

use super::{Result, ScoreError};
use crate::dataset::IterationDataset;
use crate::mutant::MutantCategory;
use crate::rate::{record_rate, round_to, RATE_PRECISION};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Best-case rate of one test across all iterations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestRate {
    /// Iteration that first reached the rate
    pub iteration: String,
    pub rate: f64,
}

/// Score of one mutant category (or of all categories together)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Mean best-case kill rate, rounded to three places
    pub avg_rate: f64,
    /// Tests whose best-case rate is strictly positive
    pub caught: usize,
}

impl CategoryScore {
    /// Percentage of `total_tests` mutants caught
    pub fn mutation_score(&self, total_tests: usize) -> f64 {
        if total_tests == 0 {
            return 0.0;
        }
        self.caught as f64 / total_tests as f64 * 100.0
    }
}

/// Scores for every category plus the `all` roll-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationScores {
    pub reversing_po: CategoryScore,
    pub weakening_po: CategoryScore,
    pub weakening_sw: CategoryScore,
    pub all: CategoryScore,
}

impl MutationScores {
    /// Score of a single category
    pub fn get(&self, category: MutantCategory) -> &CategoryScore {
        match category {
            MutantCategory::ReversingPo => &self.reversing_po,
            MutantCategory::WeakeningPo => &self.weakening_po,
            MutantCategory::WeakeningSw => &self.weakening_sw,
        }
    }
}

/// Output of [`per_test_stats`]
#[derive(Debug, Clone)]
pub struct TestScoreReport {
    pub scores: MutationScores,
    /// Best rate per test, in order of first appearance
    pub best: IndexMap<String, BestRate>,
    by_category: [Vec<f64>; 3],
    all_rates: Vec<f64>,
}

impl TestScoreReport {
    /// Best rates of one category, in test order
    pub fn category_rates(&self, category: MutantCategory) -> &[f64] {
        &self.by_category[slot(category)]
    }

    /// Best rates of all tests: reversing-po, then weakening-po, then
    /// weakening-sw
    pub fn all_rates(&self) -> &[f64] {
        &self.all_rates
    }
}

fn slot(category: MutantCategory) -> usize {
    match category {
        MutantCategory::ReversingPo => 0,
        MutantCategory::WeakeningPo => 1,
        MutantCategory::WeakeningSw => 2,
    }
}

/// Mean of `rates` rounded to three places; an empty list is an error
/// naming `label`.
pub(crate) fn rounded_mean(rates: &[f64], label: &str) -> Result<f64> {
    if rates.is_empty() {
        return Err(ScoreError::EmptyCategory(label.to_string()));
    }
    let sum: f64 = rates.iter().sum();
    Ok(round_to(sum / rates.len() as f64, RATE_PRECISION))
}

/// Compute mutation scores for one dataset.
///
/// Every test keeps the maximum rate any iteration observed (the earliest
/// iteration wins ties). Best rates are bucketed by the category assigned at
/// load time. Each category must contain at least one test.
pub fn per_test_stats(dataset: &IterationDataset) -> Result<TestScoreReport> {
    let mut best: IndexMap<String, BestRate> = IndexMap::with_capacity(dataset.num_tests());

    for (iteration, tests) in dataset.iterations() {
        for (test, record) in tests {
            let rate = record_rate(record, iteration, test)?;
            match best.get_mut(test.as_str()) {
                Some(current) if current.rate >= rate => {}
                Some(current) => {
                    current.rate = rate;
                    current.iteration = iteration.to_string();
                }
                None => {
                    best.insert(
                        test.clone(),
                        BestRate {
                            iteration: iteration.to_string(),
                            rate,
                        },
                    );
                }
            }
        }
    }

    let mut by_category: [Vec<f64>; 3] = Default::default();
    let mut caught = [0usize; 3];
    for (test, best_rate) in &best {
        let category = dataset
            .category(test)
            .unwrap_or_else(|| MutantCategory::from_test_name(test));
        let idx = slot(category);
        by_category[idx].push(best_rate.rate);
        if best_rate.rate > 0.0 {
            caught[idx] += 1;
        }
    }

    debug!(
        reversing_po = by_category[0].len(),
        weakening_po = by_category[1].len(),
        weakening_sw = by_category[2].len(),
        "bucketed best rates"
    );

    let mut category_scores = [CategoryScore {
        avg_rate: 0.0,
        caught: 0,
    }; 3];
    for category in MutantCategory::ALL {
        let idx = slot(category);
        category_scores[idx] = CategoryScore {
            avg_rate: rounded_mean(&by_category[idx], category.key())?,
            caught: caught[idx],
        };
    }

    let all_rates: Vec<f64> = by_category.iter().flatten().copied().collect();
    let all = CategoryScore {
        avg_rate: rounded_mean(&all_rates, "all")?,
        caught: caught.iter().sum(),
    };

    Ok(TestScoreReport {
        scores: MutationScores {
            reversing_po: category_scores[0],
            weakening_po: category_scores[1],
            weakening_sw: category_scores[2],
            all,
        },
        best,
        by_category,
        all_rates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded_mean() {
        assert_eq!(rounded_mean(&[1.0, 2.0], "x").unwrap(), 1.5);
        assert_eq!(rounded_mean(&[1.0, 1.0, 0.0], "x").unwrap(), 0.667);
    }

    #[test]
    fn test_rounded_mean_empty() {
        assert_eq!(
            rounded_mean(&[], "weakening_po"),
            Err(ScoreError::EmptyCategory("weakening_po".to_string()))
        );
    }

    #[test]
    fn test_mutation_score_percentage() {
        let score = CategoryScore {
            avg_rate: 1.0,
            caught: 6,
        };
        assert_eq!(score.mutation_score(8), 75.0);
        assert_eq!(score.mutation_score(0), 0.0);
    }
}
