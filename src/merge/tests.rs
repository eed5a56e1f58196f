// Scenario tests for environment merging
//
// Every record below runs for one second, so a test's rate equals its weak
// count.

use super::*;
use crate::dataset::{DeviceStats, IterationDataset};
use serde_json::{json, Map, Value};

fn device(name: &str, iterations: &[(&str, &[(&str, u64)])]) -> DeviceStats {
    let mut root = Map::new();
    root.insert("randomSeed".to_string(), json!("seed"));
    for (id, tests) in iterations {
        let mut observed = Map::new();
        observed.insert("params".to_string(), json!({ "workgroups": 4 }));
        for (test, weak) in tests.iter() {
            observed.insert(
                test.to_string(),
                json!({ "weak": weak, "durationSeconds": 1.0 }),
            );
        }
        root.insert(id.to_string(), Value::Object(observed));
    }
    DeviceStats::new(name, IterationDataset::from_value(Value::Object(root)).unwrap())
}

#[test]
fn test_single_test_two_environments() {
    let envs = [
        device("intel", &[("0", &[("MP Coherency", 5)])]),
        device("amd", &[("0", &[("MP Coherency", 1)])]),
    ];

    let outcome = merge_test_environments(&envs, 0.99999, 4.0).unwrap();
    assert_eq!(outcome.ceiling_rate, 3.0);
    assert_eq!(outcome.chosen["MP Coherency"].reproducible_count, 1);
    assert_eq!(outcome.chosen["MP Coherency"].min_positive_rate, 1.0);
    assert_eq!(outcome.reproducible, 1);
}

#[test]
fn test_iteration_with_most_reproducing_environments_wins() {
    let envs = [
        device("intel", &[("0", &[("T", 1)]), ("1", &[("T", 5)])]),
        device("amd", &[("0", &[("T", 9)]), ("1", &[("T", 4)])]),
    ];

    let outcome = merge_test_environments(&envs, 0.99999, 4.0).unwrap();
    assert_eq!(outcome.chosen["T"].source_iteration, "1");
    assert_eq!(outcome.reproducible, 2);
}

#[test]
fn test_ties_prefer_larger_minimum_positive_rate() {
    // Both iterations reproduce in one environment; iteration 1's weaker
    // environment is less marginal
    let envs = [
        device("intel", &[("0", &[("T", 5)]), ("1", &[("T", 4)])]),
        device("amd", &[("0", &[("T", 1)]), ("1", &[("T", 2)])]),
    ];

    let outcome = merge_test_environments(&envs, 0.99999, 4.0).unwrap();
    let chosen = &outcome.chosen["T"];
    assert_eq!(chosen.source_iteration, "1");
    assert_eq!(chosen.reproducible_count, 1);
    assert_eq!(chosen.min_positive_rate, 2.0);
    assert_eq!(outcome.reproducible, 1);
}

#[test]
fn test_full_tie_keeps_earlier_iteration() {
    let envs = [
        device("intel", &[("7", &[("T", 6)]), ("3", &[("T", 6)])]),
        device("amd", &[("7", &[("T", 6)]), ("3", &[("T", 6)])]),
    ];

    let outcome = merge_test_environments(&envs, 0.99999, 4.0).unwrap();
    assert_eq!(outcome.chosen["T"].source_iteration, "7");
}

#[test]
fn test_no_weak_behaviors_uses_sentinel() {
    let envs = [
        device("intel", &[("0", &[("T", 0)])]),
        device("amd", &[("0", &[("T", 0)])]),
    ];

    let outcome = merge_test_environments(&envs, 0.95, 1.0).unwrap();
    assert_eq!(outcome.chosen["T"].min_positive_rate, NO_POSITIVE_RATE);
    assert_eq!(outcome.chosen["T"].reproducible_count, 0);
    assert_eq!(outcome.reproducible, 0);
}

#[test]
fn test_all_zero_iteration_beats_sub_threshold_rates() {
    // Neither iteration reproduces anywhere; iteration 1 never shows weak
    // behavior, so its sentinel minimum outranks iteration 0's rates of 1 and 2
    let envs = [
        device("intel", &[("0", &[("T", 1)]), ("1", &[("T", 0)])]),
        device("amd", &[("0", &[("T", 2)]), ("1", &[("T", 0)])]),
    ];

    let outcome = merge_test_environments(&envs, 0.99999, 4.0).unwrap();
    let chosen = &outcome.chosen["T"];
    assert_eq!(chosen.source_iteration, "1");
    assert_eq!(chosen.reproducible_count, 0);
    assert_eq!(chosen.min_positive_rate, NO_POSITIVE_RATE);
    assert_eq!(outcome.reproducible, 0);
}

#[test]
fn test_each_test_chooses_independently() {
    let envs = [
        device(
            "intel",
            &[("0", &[("X", 9), ("Y", 0)]), ("1", &[("X", 0), ("Y", 9)])],
        ),
        device(
            "amd",
            &[("0", &[("X", 9), ("Y", 1)]), ("1", &[("X", 1), ("Y", 9)])],
        ),
    ];

    let outcome = merge_test_environments(&envs, 0.99999, 4.0).unwrap();
    assert_eq!(outcome.chosen["X"].source_iteration, "0");
    assert_eq!(outcome.chosen["Y"].source_iteration, "1");
    assert_eq!(outcome.reproducible, 4);
    assert_eq!(outcome.max_pairs(), 4);
    assert_eq!(outcome.percent(), 100.0);
}

#[test]
fn test_count_never_exceeds_pairs() {
    let envs = [
        device("a", &[("0", &[("X", 100), ("Y", 100)])]),
        device("b", &[("0", &[("X", 100), ("Y", 100)])]),
        device("c", &[("0", &[("X", 100), ("Y", 0)])]),
    ];

    let outcome = merge_test_environments(&envs, 0.5, 1.0).unwrap();
    assert_eq!(outcome.reproducible, 5);
    assert!(outcome.reproducible <= outcome.num_tests * outcome.num_environments);
}

#[test]
fn test_longer_budget_reproduces_more() {
    let envs = [
        device("intel", &[("0", &[("T", 2)])]),
        device("amd", &[("0", &[("T", 1)])]),
    ];

    let short = merge_test_environments(&envs, 0.99999, 4.0).unwrap();
    let long = merge_test_environments(&envs, 0.99999, 12.0).unwrap();
    assert_eq!(short.reproducible, 0);
    assert_eq!(long.reproducible, 2);
}

#[test]
fn test_no_environments() {
    assert_eq!(
        merge_test_environments(&[], 0.95, 1.0).unwrap_err(),
        MergeError::NoEnvironments
    );
}

#[test]
fn test_environment_without_iterations() {
    let empty = DeviceStats::new("m1", IterationDataset::default());
    assert_eq!(
        merge_test_environments(&[empty], 0.95, 1.0).unwrap_err(),
        MergeError::NoIterations("m1".to_string())
    );
}

#[test]
fn test_mismatched_iterations_fail_fast() {
    let envs = [
        device("intel", &[("0", &[("T", 1)])]),
        device("amd", &[("1", &[("T", 1)])]),
    ];

    assert_eq!(
        merge_test_environments(&envs, 0.95, 1.0).unwrap_err(),
        MergeError::MismatchedIterations {
            device: "amd".to_string(),
            reference: "intel".to_string(),
        }
    );
}

#[test]
fn test_missing_test_fails_fast() {
    let envs = [
        device("intel", &[("0", &[("T", 1), ("U", 1)])]),
        device("amd", &[("0", &[("T", 1)])]),
    ];

    assert_eq!(
        merge_test_environments(&envs, 0.95, 1.0).unwrap_err(),
        MergeError::MismatchedTests {
            device: "amd".to_string(),
            iteration: "0".to_string(),
            test: "U".to_string(),
        }
    );
}

#[test]
fn test_extra_test_fails_fast() {
    let envs = [
        device("intel", &[("0", &[("T", 1)])]),
        device("amd", &[("0", &[("T", 1), ("V", 3)])]),
    ];

    let err = merge_test_environments(&envs, 0.95, 1.0).unwrap_err();
    assert!(err.to_string().contains("`V`"));
}

#[test]
fn test_invalid_parameters_are_rejected() {
    let envs = [device("intel", &[("0", &[("T", 1)])])];
    assert!(matches!(
        merge_test_environments(&envs, 1.5, 1.0),
        Err(MergeError::InvalidReproducibility(_))
    ));
    assert!(matches!(
        merge_test_environments(&envs, 0.95, 0.0),
        Err(MergeError::InvalidBudget(_))
    ));
}

#[test]
fn test_budget_sweep_points() {
    let envs = [
        device("intel", &[("0", &[("T", 2)])]),
        device("amd", &[("0", &[("T", 1)])]),
    ];
    let budgets = vec!["1/2".to_string(), "4".to_string(), "16".to_string()];

    let points = budget_sweep(&envs, &[0.95, 0.99999], &budgets).unwrap();
    assert_eq!(points.len(), 6);
    assert_eq!(points[0].budget, "1/2");
    assert_eq!(points[0].budget_seconds, 0.5);
    assert_eq!(points[1].reproducibility, 0.99999);

    // 0.95 needs 3 events: 6/s at 1/2s, 0.75/s at 4s
    assert_eq!(points[0].reproducible, 0);
    assert_eq!(points[2].reproducible, 2);
    assert_eq!(points[2].percent, 100.0);

    // 0.99999 needs 12 events: 3/s at 4s, 0.75/s at 16s
    assert_eq!(points[3].reproducible, 0);
    assert_eq!(points[5].reproducible, 2);

    for pair in points.chunks(2).collect::<Vec<_>>().windows(2) {
        assert!(pair[1][0].reproducible >= pair[0][0].reproducible);
        assert!(pair[1][1].reproducible >= pair[0][1].reproducible);
    }
}

#[test]
fn test_budget_sweep_rejects_bad_label() {
    let envs = [device("intel", &[("0", &[("T", 2)])])];
    let budgets = vec!["soon".to_string()];
    assert!(matches!(
        budget_sweep(&envs, &[0.95], &budgets),
        Err(MergeError::InvalidBudget(_))
    ));
}
