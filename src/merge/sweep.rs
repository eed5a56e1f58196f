// Reproducible share of an environment across per-test budgets

use super::search::merge_test_environments;
use super::threshold::parse_budget;
use super::Result;
use crate::dataset::DeviceStats;
use serde::Serialize;

/// One (budget, reproducibility) point of a sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPoint {
    /// Budget as written, e.g. `1/1024`
    pub budget: String,
    pub budget_seconds: f64,
    pub reproducibility: f64,
    pub reproducible: usize,
    /// Share of all (test, environment) pairs, in percent
    pub percent: f64,
}

/// Run the environment merge for every budget label and reproducibility
/// level. Points are ordered by budget, then by level.
pub fn budget_sweep(
    all_stats: &[DeviceStats],
    levels: &[f64],
    budgets: &[String],
) -> Result<Vec<SweepPoint>> {
    let mut points = Vec::with_capacity(levels.len() * budgets.len());
    for label in budgets {
        let budget_seconds = parse_budget(label)?;
        for &reproducibility in levels {
            let outcome = merge_test_environments(all_stats, reproducibility, budget_seconds)?;
            points.push(SweepPoint {
                budget: label.clone(),
                budget_seconds,
                reproducibility,
                reproducible: outcome.reproducible,
                percent: outcome.percent(),
            });
        }
    }
    Ok(points)
}
