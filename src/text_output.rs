//! Human-readable text reports (default `--format text`)

use crate::config::CategoryTotals;
use crate::correlation::CorrelationMatrix;
use crate::merge::{MergeOutcome, SweepPoint};
use crate::mutant::MutantCategory;
use crate::scoring::{CategoryScore, DeviceScoreReport, RateSummary, TestScoreReport};
use std::fmt::Write;

const RULE: &str = "------------ ------------ ---------";

fn score_row(out: &mut String, label: &str, score: &CategoryScore) {
    let _ = writeln!(out, "{:<12} {:>12.3} {:>9}", label, score.avg_rate, score.caught);
}

/// Per-category scores of one dataset
pub fn render_mutation_scores(report: &TestScoreReport, extended: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12} {:>12} {:>9}", "category", "avg rate/s", "caught");
    let _ = writeln!(out, "{}", RULE);
    for category in MutantCategory::ALL {
        score_row(&mut out, category.key(), report.scores.get(category));
    }
    let _ = writeln!(out, "{}", RULE);
    score_row(&mut out, "all", &report.scores.all);

    if extended {
        let _ = writeln!(out, "\n=== Kill Rate Distribution (SIMD-accelerated via Trueno) ===\n");
        for category in MutantCategory::ALL {
            if let Some(summary) = RateSummary::from_rates(report.category_rates(category)) {
                render_summary(&mut out, category.label(), &summary);
            }
        }
        if let Some(summary) = RateSummary::from_rates(report.all_rates()) {
            render_summary(&mut out, "All", &summary);
        }
    }
    out
}

fn render_summary(out: &mut String, label: &str, summary: &RateSummary) {
    let _ = writeln!(out, "{} ({} tests):", label, summary.count);
    let _ = writeln!(out, "  Mean:         {:.3}/s", summary.mean);
    let _ = writeln!(out, "  Std Dev:      {:.3}/s", summary.stddev);
    let _ = writeln!(out, "  Min:          {:.3}/s", summary.min);
    let _ = writeln!(out, "  Max:          {:.3}/s", summary.max);
    let _ = writeln!(out, "  Median (P50): {:.3}/s", summary.median);
    let _ = writeln!(out, "  P90:          {:.3}/s", summary.p90);
    let _ = writeln!(out);
}

/// Per-device scores of one environment with mutation-score percentages
pub fn render_environment_scores(
    environment: &str,
    report: &DeviceScoreReport,
    totals: &CategoryTotals,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", environment);
    let _ = writeln!(
        out,
        "{:<10} {:<12} {:>12} {:>9} {:>8}",
        "device", "category", "avg rate/s", "caught", "score"
    );
    for (device, scores) in &report.devices {
        for category in MutantCategory::ALL {
            let score = scores.get(category);
            let _ = writeln!(
                out,
                "{:<10} {:<12} {:>12.3} {:>9} {:>7.1}%",
                device,
                category.key(),
                score.avg_rate,
                score.caught,
                score.mutation_score(totals.get(category))
            );
        }
        let _ = writeln!(
            out,
            "{:<10} {:<12} {:>12.3} {:>9} {:>7.1}%",
            device,
            "all",
            scores.all.avg_rate,
            scores.all.caught,
            scores.all.mutation_score(totals.total())
        );
    }
    let _ = writeln!(
        out,
        "{:<10} {:<12} {:>12.3} {:>9} {:>7.1}%",
        "total",
        "all",
        report.all.avg_rate,
        report.all.caught,
        report
            .all
            .mutation_score(totals.total() * report.devices.len())
    );
    out
}

/// Outcome of an environment merge
pub fn render_merge(outcome: &MergeOutcome, reproducibility: f64, budget_seconds: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Reproducibility: {}% within {} s per test",
        format_percent(reproducibility),
        budget_seconds
    );
    let _ = writeln!(out, "Required rate:   {:.3} weak behaviors/s", outcome.ceiling_rate);
    let _ = writeln!(
        out,
        "Reproducible:    {} of {} test/environment pairs ({:.1}%)",
        outcome.reproducible,
        outcome.max_pairs(),
        outcome.percent()
    );
    out
}

/// Budget sweep table for one environment
pub fn render_sweep(environment: &str, points: &[SweepPoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", environment);
    let _ = writeln!(
        out,
        "{:>8} {:>10} {:>12} {:>8}",
        "budget", "target", "reproducible", "score"
    );
    for point in points {
        let _ = writeln!(
            out,
            "{:>8} {:>9}% {:>12} {:>7.1}%",
            point.budget,
            format_percent(point.reproducibility),
            point.reproducible,
            point.percent
        );
    }
    out
}

/// Full correlation matrix, one `testA  testB  r` line per pair (i < j)
pub fn render_correlation(matrix: &CorrelationMatrix) -> String {
    let mut out = String::new();
    let tests = matrix.tests();
    for i in 0..tests.len() {
        for j in (i + 1)..tests.len() {
            let _ = writeln!(
                out,
                "{}\t{}\t{}",
                tests[i],
                tests[j],
                format_coefficient(matrix.at(i, j))
            );
        }
    }
    out
}

/// Reproducibility fraction as a percent with at most three decimals
/// (0.99999 prints as `99.999`, 0.95 as `95`)
pub fn format_percent(fraction: f64) -> String {
    let fixed = format!("{:.3}", fraction * 100.0);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Coefficient as printed in text reports
pub fn format_coefficient(r: f64) -> String {
    if r.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.6}", r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation::correlate;
    use crate::dataset::IterationDataset;
    use crate::scoring::per_test_stats;

    fn run() -> IterationDataset {
        IterationDataset::from_json_str(
            r#"{
                "0": {
                    "FooMutations": { "weak": 5, "durationSeconds": 2.0 },
                    "FooCoherency": { "weak": 0, "durationSeconds": 1.0 },
                    "FooBarrier": { "weak": 3, "durationSeconds": 1.0 }
                },
                "1": {
                    "FooMutations": { "weak": 1, "durationSeconds": 2.0 },
                    "FooCoherency": { "weak": 2, "durationSeconds": 1.0 },
                    "FooBarrier": { "weak": 3, "durationSeconds": 1.0 }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_mutation_score_table() {
        let report = per_test_stats(&run()).unwrap();
        let text = render_mutation_scores(&report, false);
        assert!(text.contains("reversing_po"));
        assert!(text.contains("2.500"));
        assert!(!text.contains("Trueno"));
    }

    #[test]
    fn test_extended_section() {
        let report = per_test_stats(&run()).unwrap();
        let text = render_mutation_scores(&report, true);
        assert!(text.contains("Kill Rate Distribution"));
        assert!(text.contains("Reversing po (1 tests):"));
    }

    #[test]
    fn test_format_percent_drops_float_noise() {
        assert_eq!(format_percent(0.99999), "99.999");
        assert_eq!(format_percent(0.95), "95");
        assert_eq!(format_percent(0.5), "50");
        assert_eq!(format_percent(0.125), "12.5");
    }

    #[test]
    fn test_merge_header() {
        let outcome = MergeOutcome {
            ceiling_rate: 3.0,
            reproducible: 3,
            num_tests: 2,
            num_environments: 2,
            chosen: indexmap::IndexMap::new(),
        };
        let text = render_merge(&outcome, 0.99999, 0.5);
        assert!(text.starts_with("Reproducibility: 99.999% within 0.5 s per test\n"));
        assert!(!text.contains("0000"));
        assert!(text.contains("3 of 4 test/environment pairs (75.0%)"));
    }

    #[test]
    fn test_correlation_lines() {
        let text = render_correlation(&correlate(&run()));
        // FooBarrier is constant
        assert!(text.contains("FooMutations\tFooBarrier\tNaN"));
        assert!(text.contains("FooMutations\tFooCoherency\t-1.000000"));
        assert_eq!(text.lines().count(), 3);
    }
}
