// Analysis configuration
//
// One place for the device list, environment names, expected suite sizes and
// sweep parameters shared by every analysis command. Defaults describe the
// standard suite: 32 tests under four environments, with devices discovered
// from each environment directory.

use crate::merge::parse_budget;
use crate::mutant::MutantCategory;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Expected number of tests in each mutant category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryTotals {
    pub reversing_po: usize,
    pub weakening_po: usize,
    pub weakening_sw: usize,
}

impl Default for CategoryTotals {
    fn default() -> Self {
        Self {
            reversing_po: 8,
            weakening_po: 6,
            weakening_sw: 18,
        }
    }
}

impl CategoryTotals {
    pub fn get(&self, category: MutantCategory) -> usize {
        match category {
            MutantCategory::ReversingPo => self.reversing_po,
            MutantCategory::WeakeningPo => self.weakening_po,
            MutantCategory::WeakeningSw => self.weakening_sw,
        }
    }

    /// Tests in the whole suite
    pub fn total(&self) -> usize {
        self.reversing_po + self.weakening_po + self.weakening_sw
    }
}

/// Configuration for every analysis command
///
/// # Example
/// ```
/// use killscope::config::AnalysisConfig;
///
/// let config = AnalysisConfig::from_toml_str(r#"devices = ["intel", "amd"]"#).unwrap();
/// assert_eq!(config.devices, vec!["intel", "amd"]);
/// assert_eq!(config.tests.total(), 32); // unset fields keep their defaults
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Device dataset files to load from an environment directory, in
    /// reporting order. Empty (the default): load every `*.json` file.
    pub devices: Vec<String>,

    /// Environment directories (relative to the analysis root) scored when
    /// none are given on the command line
    pub environments: Vec<String>,

    /// Expected suite size, the denominator of mutation-score percentages
    pub tests: CategoryTotals,

    /// Per-test budgets for `budget-sweep`, in seconds or as fractions
    pub budgets: Vec<String>,

    /// Reproducibility targets for `budget-sweep`, each in (0, 1)
    pub reproducibility_levels: Vec<f64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            environments: ["site_baseline", "site", "pte_baseline", "pte"]
                .into_iter()
                .map(String::from)
                .collect(),
            tests: CategoryTotals::default(),
            budgets: [
                "1/1024", "1/512", "1/256", "1/128", "1/64", "1/32", "1/16", "1/8", "1/4", "1/2",
                "1", "2", "4", "8", "16", "32", "64",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            reproducibility_levels: vec![0.95, 0.99999],
        }
    }
}

impl AnalysisConfig {
    /// Load and validate a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Parse and validate a TOML configuration
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        for (i, device) in self.devices.iter().enumerate() {
            if device.is_empty() {
                return Err("device names must not be empty".to_string());
            }
            if self.devices[..i].contains(device) {
                return Err(format!("device `{}` listed twice", device));
            }
        }

        for category in MutantCategory::ALL {
            if self.tests.get(category) == 0 {
                return Err(format!(
                    "tests.{} must be at least 1",
                    category.key()
                ));
            }
        }

        for level in &self.reproducibility_levels {
            if !(*level > 0.0 && *level < 1.0) {
                return Err(format!(
                    "reproducibility level must be in (0, 1), got {}",
                    level
                ));
            }
        }

        for budget in &self.budgets {
            parse_budget(budget).map_err(|e| e.to_string())?;
        }

        Ok(())
    }
}
