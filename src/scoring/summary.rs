// Descriptive statistics of best-case kill rates (--extended)
//
// Uses trueno::Vector for SIMD mean/stddev/min/max. The values are reported
// at f32 precision; the authoritative avg_rate stays the exact f64 mean.

use serde::Serialize;
use trueno::Vector;

/// Distribution summary of a list of kill rates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSummary {
    pub count: usize,
    pub mean: f32,
    pub stddev: f32,
    pub min: f32,
    pub max: f32,
    pub median: f32, // P50
    pub p90: f32,
}

impl RateSummary {
    /// Summarize `rates`; `None` when there are no rates
    pub fn from_rates(rates: &[f64]) -> Option<Self> {
        if rates.is_empty() {
            return None;
        }

        let values: Vec<f32> = rates.iter().map(|&r| r as f32).collect();
        let v = Vector::from_slice(&values);

        let mut sorted = values.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        Some(Self {
            count: values.len(),
            mean: v.mean().unwrap_or(0.0),
            stddev: v.stddev().unwrap_or(0.0),
            min: v.min().unwrap_or(0.0),
            max: v.max().unwrap_or(0.0),
            median: percentile(&sorted, 50.0),
            p90: percentile(&sorted, 90.0),
        })
    }
}

/// Linear-interpolated percentile of sorted data
fn percentile(sorted_data: &[f32], percentile: f32) -> f32 {
    if sorted_data.is_empty() {
        return 0.0;
    }
    if sorted_data.len() == 1 {
        return sorted_data[0];
    }

    let index = (percentile / 100.0) * (sorted_data.len() - 1) as f32;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted_data[lower]
    } else {
        let weight = index - lower as f32;
        sorted_data[lower] * (1.0 - weight) + sorted_data[upper] * weight
    }
}
