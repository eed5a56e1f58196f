// Cross-device and cross-environment score roll-ups
//
// An environment is one testing configuration (e.g. a stress strategy) run on
// several devices. Its overall score pools every device's per-test best rates.

use super::aggregate::{per_test_stats, rounded_mean, CategoryScore, MutationScores};
use super::{Result, ScoreError};
use crate::dataset::DeviceStats;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

/// Scores of every device in one environment
#[derive(Debug, Clone, Serialize)]
pub struct DeviceScoreReport {
    /// Per-device category scores, in device order
    pub devices: IndexMap<String, MutationScores>,
    /// Pooled score across every test of every device
    pub all: CategoryScore,
    #[serde(skip)]
    rates: Vec<f64>,
}

impl DeviceScoreReport {
    /// Best rates of every device, concatenated in device order
    pub fn pooled_rates(&self) -> &[f64] {
        &self.rates
    }
}

/// Score every device of an environment and pool the results
pub fn device_scores(devices: &[DeviceStats]) -> Result<DeviceScoreReport> {
    if devices.is_empty() {
        return Err(ScoreError::NoDevices);
    }

    let mut per_device = IndexMap::with_capacity(devices.len());
    let mut rates = Vec::new();
    let mut caught = 0;
    for stats in devices {
        let report = per_test_stats(&stats.data)?;
        debug!(
            device = %stats.device,
            caught = report.scores.all.caught,
            avg_rate = report.scores.all.avg_rate,
            "scored device"
        );
        caught += report.scores.all.caught;
        rates.extend_from_slice(report.all_rates());
        per_device.insert(stats.device.clone(), report.scores);
    }

    Ok(DeviceScoreReport {
        devices: per_device,
        all: CategoryScore {
            avg_rate: rounded_mean(&rates, "all")?,
            caught,
        },
        rates,
    })
}

/// Score several environments, keyed by environment name in input order
pub fn environment_scores(
    environments: &[(String, Vec<DeviceStats>)],
) -> Result<IndexMap<String, DeviceScoreReport>> {
    environments
        .iter()
        .map(|(name, devices)| Ok((name.clone(), device_scores(devices)?)))
        .collect()
}
