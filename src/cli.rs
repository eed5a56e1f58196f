//! CLI argument parsing for killscope

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for analysis reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "killscope")]
#[command(version)]
#[command(about = "Mutation scores, environment merging and correlation for litmus test runs", long_about = None)]
pub struct Cli {
    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Analysis configuration file (TOML)
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug tracing to stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Mutation scores and average mutant death rates for one dataset
    MutationScore {
        /// Test run dataset (JSON)
        #[arg(value_name = "FILE")]
        stats_path: PathBuf,

        /// Add kill rate distribution statistics per category
        #[arg(long = "extended")]
        extended: bool,
    },

    /// Scores of every device in one or more environment directories
    DeviceScores {
        /// Environment directories; defaults to the configured environments under --root
        #[arg(value_name = "ENV_DIR")]
        environments: Vec<PathBuf>,

        /// Directory holding the configured environments
        #[arg(long = "root", value_name = "DIR", default_value = ".")]
        root: PathBuf,
    },

    /// Combine test environments across the devices of one environment directory
    Merge {
        /// Environment directory with one <device>.json per device
        #[arg(value_name = "ENV_DIR")]
        stats_path: PathBuf,

        /// Reproducibility target in percent (e.g. 99.999)
        #[arg(long = "reproducibility", value_name = "PERCENT")]
        reproducibility: f64,

        /// Per-test time budget in seconds, or a fraction such as 1/1024
        #[arg(long = "budget", value_name = "SECONDS")]
        budget: String,
    },

    /// Reproducible share for every configured budget and reproducibility level
    BudgetSweep {
        /// Environment directories to sweep
        #[arg(value_name = "ENV_DIR", required = true)]
        environments: Vec<PathBuf>,
    },

    /// Pearson correlation of weak behavior counts between tests
    Correlation {
        /// Test run dataset (JSON)
        #[arg(value_name = "FILE")]
        stats_path: PathBuf,

        /// Print the coefficient of a single pair of tests
        #[arg(long = "pair", num_args = 2, value_names = ["TEST_A", "TEST_B"])]
        pair: Option<Vec<String>>,
    },
}
