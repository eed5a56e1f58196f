//! Test run datasets produced by the litmus test harness
//!
//! A dataset file maps iteration identifiers to the tests run in that
//! iteration:
//!
//! ```json
//! {
//!   "randomSeed": "seed",
//!   "0": {
//!     "params": { "testingWorkgroups": 2 },
//!     "RR Mutations Default": { "weak": 5, "durationSeconds": 2.0 }
//!   }
//! }
//! ```
//!
//! `randomSeed` (top level) and `params` (per iteration) are run metadata and
//! never take part in aggregation. Iteration and test order from the file is
//! preserved. Each test is classified into its [`MutantCategory`] once, here.

use crate::mutant::MutantCategory;
use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Top-level key holding the harness random seed
pub const RANDOM_SEED_KEY: &str = "randomSeed";
/// Per-iteration key holding run parameters
pub const PARAMS_KEY: &str = "params";

/// Errors that can occur while loading a dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON object for {0}")]
    NotAnObject(String),

    /// A record missing `weak` or `durationSeconds`, or with a wrong type.
    /// `weak` must be a non-negative JSON integer: `5.0` and `-1` are
    /// rejected rather than truncated.
    #[error("Malformed record for test `{test}` in iteration `{iteration}`: {source}")]
    MalformedRecord {
        iteration: String,
        test: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for dataset operations
pub type Result<T> = std::result::Result<T, DatasetError>;

/// One observation of a single test within one iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestRunRecord {
    /// Number of weak behaviors observed; integral in the harness output
    pub weak: u64,
    /// Wall-clock time the test ran for
    #[serde(rename = "durationSeconds")]
    pub duration_seconds: f64,
}

/// Tests observed in one iteration, keyed by test name
pub type IterationTests = IndexMap<String, TestRunRecord>;

/// A full test run: iteration id → test name → record
#[derive(Debug, Clone, Default)]
pub struct IterationDataset {
    iterations: IndexMap<String, IterationTests>,
    categories: IndexMap<String, MutantCategory>,
    random_seed: Option<Value>,
}

impl IterationDataset {
    /// Load a dataset from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json_str(&contents)?;
        debug!(
            path = %path.display(),
            iterations = dataset.num_iterations(),
            tests = dataset.num_tests(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Parse a dataset from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Build a dataset from an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(root) = value else {
            return Err(DatasetError::NotAnObject("dataset root".to_string()));
        };

        let mut dataset = Self::default();
        for (iteration_id, iteration) in root {
            if iteration_id == RANDOM_SEED_KEY {
                dataset.random_seed = Some(iteration);
                continue;
            }

            let Value::Object(entries) = iteration else {
                return Err(DatasetError::NotAnObject(format!(
                    "iteration `{}`",
                    iteration_id
                )));
            };

            let mut tests = IterationTests::with_capacity(entries.len());
            for (test, record) in entries {
                if test == PARAMS_KEY {
                    continue;
                }
                let record: TestRunRecord =
                    serde_json::from_value(record).map_err(|source| {
                        DatasetError::MalformedRecord {
                            iteration: iteration_id.clone(),
                            test: test.clone(),
                            source,
                        }
                    })?;
                dataset
                    .categories
                    .entry(test.clone())
                    .or_insert_with(|| MutantCategory::from_test_name(&test));
                tests.insert(test, record);
            }
            dataset.iterations.insert(iteration_id, tests);
        }

        Ok(dataset)
    }

    /// Iterations in file order, metadata excluded
    pub fn iterations(&self) -> impl Iterator<Item = (&str, &IterationTests)> {
        self.iterations.iter().map(|(id, tests)| (id.as_str(), tests))
    }

    /// Iteration identifiers in file order
    pub fn iteration_ids(&self) -> impl Iterator<Item = &str> {
        self.iterations.keys().map(String::as_str)
    }

    /// Tests of a single iteration
    pub fn iteration(&self, id: &str) -> Option<&IterationTests> {
        self.iterations.get(id)
    }

    /// The record for one (iteration, test) pair
    pub fn record(&self, iteration: &str, test: &str) -> Option<&TestRunRecord> {
        self.iterations.get(iteration)?.get(test)
    }

    /// Every test name seen in any iteration, in order of first appearance,
    /// with its mutant category
    pub fn tests(&self) -> impl Iterator<Item = (&str, MutantCategory)> {
        self.categories
            .iter()
            .map(|(name, category)| (name.as_str(), *category))
    }

    /// Category assigned to a test at load time
    pub fn category(&self, test: &str) -> Option<MutantCategory> {
        self.categories.get(test).copied()
    }

    pub fn num_iterations(&self) -> usize {
        self.iterations.len()
    }

    pub fn num_tests(&self) -> usize {
        self.categories.len()
    }

    /// The harness random seed, if recorded
    pub fn random_seed(&self) -> Option<&Value> {
        self.random_seed.as_ref()
    }
}

/// One device's full dataset within an environment
#[derive(Debug, Clone)]
pub struct DeviceStats {
    /// Device name (file stem of `<device>.json`)
    pub device: String,
    pub data: IterationDataset,
}

impl DeviceStats {
    pub fn new(device: impl Into<String>, data: IterationDataset) -> Self {
        Self {
            device: device.into(),
            data,
        }
    }

    /// Load `<device>.json`, naming the device after the file stem
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let device = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .with_context(|| format!("Cannot derive device name from {}", path.display()))?
            .to_string();
        let data = IterationDataset::from_file(path)?;
        Ok(Self { device, data })
    }
}

/// Devices of the standard suite, in reporting order
pub const STANDARD_DEVICES: [&str; 4] = ["intel", "amd", "nvidia", "m1"];

/// Device names of every `*.json` file in `dir`: the standard devices first
/// in reporting order, then any others by name.
fn discover_devices(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut found = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?
    {
        let path = entry?.path();
        if !(path.is_file() && path.extension().is_some_and(|ext| ext == "json")) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            found.push(stem.to_string());
        }
    }

    found.sort_by(|a, b| {
        let rank = |name: &str| {
            STANDARD_DEVICES
                .iter()
                .position(|standard| *standard == name)
                .unwrap_or(STANDARD_DEVICES.len())
        };
        rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
    });
    Ok(found)
}

/// Load every device dataset of an environment directory.
///
/// With an empty `devices` list every `*.json` file in the directory is
/// loaded (see [`STANDARD_DEVICES`] for the order). A non-empty list loads
/// `<dir>/<device>.json` for each entry in that order; a listed device
/// without a file, or a dataset file for an unlisted device, is an error.
pub fn load_environment(dir: &Path, devices: &[String]) -> anyhow::Result<Vec<DeviceStats>> {
    if !dir.is_dir() {
        anyhow::bail!("Environment directory not found: {}", dir.display());
    }

    let discovered = discover_devices(dir)?;
    let names: Vec<String> = if devices.is_empty() {
        discovered
    } else {
        let unlisted: Vec<&str> = discovered
            .iter()
            .filter(|name| !devices.contains(*name))
            .map(String::as_str)
            .collect();
        if !unlisted.is_empty() {
            anyhow::bail!(
                "{} holds datasets for unconfigured devices: {}",
                dir.display(),
                unlisted.join(", ")
            );
        }
        devices.to_vec()
    };

    if names.is_empty() {
        anyhow::bail!("No device datasets found in {}", dir.display());
    }

    let stats = names
        .iter()
        .map(|device| DeviceStats::from_file(&dir.join(format!("{}.json", device))))
        .collect::<anyhow::Result<Vec<_>>>()?;
    debug!(
        environment = %dir.display(),
        devices = stats.len(),
        "loaded environment"
    );
    Ok(stats)
}

/// Environment name of a directory (its final path component)
pub fn environment_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}
