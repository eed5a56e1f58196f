//! JSON output format for analysis reports
//!
//! `--format json` prints one of these documents to stdout. The mutation
//! score document keeps the flat `{category: {avg_rate, caught}}` shape so
//! existing plotting scripts can consume it unchanged.

use crate::config::CategoryTotals;
use crate::merge::{EnvironmentCandidate, MergeOutcome, SweepPoint};
use crate::mutant::MutantCategory;
use crate::scoring::{CategoryScore, DeviceScoreReport, MutationScores, RateSummary, TestScoreReport};
use indexmap::IndexMap;
use serde::Serialize;

/// `mutation-score` output
#[derive(Debug, Clone, Serialize)]
pub struct JsonMutationScore {
    #[serde(flatten)]
    pub scores: MutationScores,
    /// Rate distribution per category (if --extended)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_summary: Option<IndexMap<String, RateSummary>>,
}

impl JsonMutationScore {
    pub fn new(report: &TestScoreReport, extended: bool) -> Self {
        let rate_summary = extended.then(|| rate_summaries(report));
        Self {
            scores: report.scores,
            rate_summary,
        }
    }
}

/// Rate distribution summaries keyed by category, plus `all`
pub fn rate_summaries(report: &TestScoreReport) -> IndexMap<String, RateSummary> {
    let mut summaries = IndexMap::new();
    for category in MutantCategory::ALL {
        if let Some(summary) = RateSummary::from_rates(report.category_rates(category)) {
            summaries.insert(category.key().to_string(), summary);
        }
    }
    if let Some(summary) = RateSummary::from_rates(report.all_rates()) {
        summaries.insert("all".to_string(), summary);
    }
    summaries
}

/// A category score with its mutation-score percentage
#[derive(Debug, Clone, Copy, Serialize)]
pub struct JsonCategoryScore {
    pub avg_rate: f64,
    pub caught: usize,
    /// Caught mutants as a percentage of the expected suite size
    pub mutation_score: f64,
}

impl JsonCategoryScore {
    pub fn new(score: &CategoryScore, total_tests: usize) -> Self {
        Self {
            avg_rate: score.avg_rate,
            caught: score.caught,
            mutation_score: score.mutation_score(total_tests),
        }
    }
}

/// `device-scores` output for one environment
#[derive(Debug, Clone, Serialize)]
pub struct JsonEnvironmentScores {
    /// device → category → score
    pub devices: IndexMap<String, IndexMap<String, JsonCategoryScore>>,
    /// Pooled across devices
    pub all: JsonCategoryScore,
}

impl JsonEnvironmentScores {
    pub fn new(report: &DeviceScoreReport, totals: &CategoryTotals) -> Self {
        let devices = report
            .devices
            .iter()
            .map(|(device, scores)| {
                let mut categories = IndexMap::new();
                for category in MutantCategory::ALL {
                    categories.insert(
                        category.key().to_string(),
                        JsonCategoryScore::new(scores.get(category), totals.get(category)),
                    );
                }
                categories.insert(
                    "all".to_string(),
                    JsonCategoryScore::new(&scores.all, totals.total()),
                );
                (device.clone(), categories)
            })
            .collect();

        Self {
            devices,
            all: JsonCategoryScore::new(&report.all, totals.total() * report.devices.len()),
        }
    }
}

/// `merge` output
#[derive(Debug, Clone, Serialize)]
pub struct JsonMerge {
    pub reproducibility: f64,
    pub budget_seconds: f64,
    pub ceiling_rate: f64,
    pub reproducible: usize,
    pub max_pairs: usize,
    pub percent: f64,
    /// Winning iteration per test
    pub chosen: IndexMap<String, EnvironmentCandidate>,
}

impl JsonMerge {
    pub fn new(outcome: &MergeOutcome, reproducibility: f64, budget_seconds: f64) -> Self {
        Self {
            reproducibility,
            budget_seconds,
            ceiling_rate: outcome.ceiling_rate,
            reproducible: outcome.reproducible,
            max_pairs: outcome.max_pairs(),
            percent: outcome.percent(),
            chosen: outcome.chosen.clone(),
        }
    }
}

/// `budget-sweep` output: environment → sweep points
pub type JsonBudgetSweep = IndexMap<String, Vec<SweepPoint>>;

/// `correlation --pair` output
#[derive(Debug, Clone, Serialize)]
pub struct JsonCorrelationPair {
    pub test_a: String,
    pub test_b: String,
    /// `null` when undefined
    pub correlation: f64,
}

/// Serialize any report to pretty JSON
pub fn to_json<T: Serialize + ?Sized>(report: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
