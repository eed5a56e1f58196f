use anyhow::{Context, Result};
use clap::Parser;
use killscope::cli::{Cli, Command, OutputFormat};
use killscope::config::AnalysisConfig;
use killscope::dataset::{environment_name, load_environment, IterationDataset};
use killscope::json_output::{
    to_json, JsonBudgetSweep, JsonCorrelationPair, JsonEnvironmentScores, JsonMerge,
    JsonMutationScore,
};
use killscope::{correlation, merge, scoring, text_output};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::from_file(path),
        None => Ok(AnalysisConfig::default()),
    }
}

fn load_dataset(path: &Path) -> Result<IterationDataset> {
    IterationDataset::from_file(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn run_mutation_score(path: &Path, extended: bool, format: OutputFormat) -> Result<()> {
    let dataset = load_dataset(path)?;
    let report = scoring::per_test_stats(&dataset)
        .with_context(|| format!("Cannot score {}", path.display()))?;

    match format {
        OutputFormat::Json => println!("{}", to_json(&JsonMutationScore::new(&report, extended))?),
        OutputFormat::Text => print!("{}", text_output::render_mutation_scores(&report, extended)),
    }
    Ok(())
}

fn run_device_scores(
    environments: Vec<PathBuf>,
    root: &Path,
    config: &AnalysisConfig,
    format: OutputFormat,
) -> Result<()> {
    let dirs: Vec<PathBuf> = if environments.is_empty() {
        config
            .environments
            .iter()
            .map(|name| root.join(name))
            .collect()
    } else {
        environments
    };
    if dirs.is_empty() {
        anyhow::bail!("No environments given and none configured");
    }

    let mut loaded = Vec::with_capacity(dirs.len());
    for dir in &dirs {
        loaded.push((environment_name(dir), load_environment(dir, &config.devices)?));
    }
    let reports = scoring::environment_scores(&loaded)?;

    match format {
        OutputFormat::Json => {
            let output: indexmap::IndexMap<_, _> = reports
                .iter()
                .map(|(name, report)| {
                    (name.clone(), JsonEnvironmentScores::new(report, &config.tests))
                })
                .collect();
            println!("{}", to_json(&output)?);
        }
        OutputFormat::Text => {
            for (name, report) in &reports {
                println!(
                    "{}",
                    text_output::render_environment_scores(name, report, &config.tests)
                );
            }
        }
    }
    Ok(())
}

fn run_merge(
    dir: &Path,
    reproducibility_percent: f64,
    budget: &str,
    config: &AnalysisConfig,
    format: OutputFormat,
) -> Result<()> {
    let reproducibility = reproducibility_percent / 100.0;
    let budget_seconds = merge::parse_budget(budget)?;
    let all_stats = load_environment(dir, &config.devices)?;
    let outcome = merge::merge_test_environments(&all_stats, reproducibility, budget_seconds)
        .with_context(|| format!("Cannot merge environments in {}", dir.display()))?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            to_json(&JsonMerge::new(&outcome, reproducibility, budget_seconds))?
        ),
        OutputFormat::Text => print!(
            "{}",
            text_output::render_merge(&outcome, reproducibility, budget_seconds)
        ),
    }
    Ok(())
}

fn run_budget_sweep(
    environments: &[PathBuf],
    config: &AnalysisConfig,
    format: OutputFormat,
) -> Result<()> {
    let mut sweeps = JsonBudgetSweep::new();
    for dir in environments {
        let all_stats = load_environment(dir, &config.devices)?;
        let points =
            merge::budget_sweep(&all_stats, &config.reproducibility_levels, &config.budgets)
                .with_context(|| format!("Cannot sweep {}", dir.display()))?;
        sweeps.insert(environment_name(dir), points);
    }

    match format {
        OutputFormat::Json => println!("{}", to_json(&sweeps)?),
        OutputFormat::Text => {
            for (name, points) in &sweeps {
                println!("{}", text_output::render_sweep(name, points));
            }
        }
    }
    Ok(())
}

fn run_correlation(path: &Path, pair: Option<Vec<String>>, format: OutputFormat) -> Result<()> {
    let dataset = load_dataset(path)?;
    let matrix = correlation::correlate(&dataset);

    match pair.as_deref() {
        Some([test_a, test_b]) => {
            let r = matrix.get(test_a, test_b)?;
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    to_json(&JsonCorrelationPair {
                        test_a: test_a.clone(),
                        test_b: test_b.clone(),
                        correlation: r,
                    })?
                ),
                OutputFormat::Text => println!("{}", text_output::format_coefficient(r)),
            }
        }
        Some(other) => anyhow::bail!("--pair takes two test names, got {}", other.len()),
        None => match format {
            OutputFormat::Json => println!("{}", to_json(&matrix)?),
            OutputFormat::Text => print!("{}", text_output::render_correlation(&matrix)),
        },
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = load_config(args.config.as_deref())?;
    let format = args.format;

    match args.command {
        Command::MutationScore {
            stats_path,
            extended,
        } => run_mutation_score(&stats_path, extended, format),
        Command::DeviceScores { environments, root } => {
            run_device_scores(environments, &root, &config, format)
        }
        Command::Merge {
            stats_path,
            reproducibility,
            budget,
        } => run_merge(&stats_path, reproducibility, &budget, &config, format),
        Command::BudgetSweep { environments } => run_budget_sweep(&environments, &config, format),
        Command::Correlation { stats_path, pair } => run_correlation(&stats_path, pair, format),
    }
}
