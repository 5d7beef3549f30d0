//! CLI entry point (§6). Two subcommands: `run` drives a full search
//! and writes the three output files; `validate` just checks an input
//! file and config against each other without searching.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use tempograph::config::RunConfig;
use tempograph::data::loader::load_csv;
use tempograph::output::{write_rule_pool, write_verification, ProgressWriter};
use tempograph::pool::RulePool;
use tempograph::{config::Dialect, init_logging, progress, trial};

#[derive(Parser, Debug)]
#[command(name = "tempograph", version, about = "Evolutionary search for temporal association rules")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// which quality-predicate dialect a `--dialect` flag selects (§4.4, §4.12)
#[derive(ValueEnum, Clone, Copy, Debug)]
enum DialectKind {
    A,
    B,
}

/// per-field overrides applied onto the loaded `RunConfig` (§4.12's `--p`,
/// `--j`, ... flag set), shared by `run` and `validate` so both subcommands
/// see the same effective config.
#[derive(Args, Debug)]
struct ConfigOverrides {
    /// number of start nodes (P)
    #[arg(long)]
    p: Option<usize>,
    /// number of judgement nodes (J)
    #[arg(long)]
    j: Option<usize>,
    /// maximum traversal depth (D_max)
    #[arg(long = "d-max")]
    d_max: Option<usize>,
    /// population size (M)
    #[arg(long)]
    population: Option<usize>,
    /// maximum allowed time-lag (MAX_LAG)
    #[arg(long = "max-lag")]
    max_lag: Option<usize>,
    /// future horizon in records, only meaningful informationally: the
    /// dialect itself determines the real future span (§4.4)
    #[arg(long = "future-span")]
    future_span: Option<usize>,
    /// rule pool capacity (R_max)
    #[arg(long = "rule-pool-max")]
    rule_pool_max: Option<usize>,
    /// number of trials to run
    #[arg(long)]
    trials: Option<usize>,
    /// quality-predicate dialect: `a` (dispersion + support) or `b` (quadrant concentration)
    #[arg(long, value_enum)]
    dialect: Option<DialectKind>,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut RunConfig) {
        if let Some(p) = self.p {
            config.start_nodes = p;
        }
        if let Some(j) = self.j {
            config.judgement_nodes = j;
        }
        if let Some(d_max) = self.d_max {
            config.max_depth = d_max;
        }
        if let Some(population) = self.population {
            config.population = population;
        }
        if let Some(max_lag) = self.max_lag {
            config.max_lag = max_lag;
        }
        if let Some(rule_pool_max) = self.rule_pool_max {
            config.rule_pool_max = rule_pool_max;
        }
        if let Some(trials) = self.trials {
            config.trial_count = trials;
        }
        if let Some(kind) = self.dialect {
            config.dialect = match (kind, &config.dialect) {
                (DialectKind::A, Dialect::Support { .. }) => config.dialect.clone(),
                (DialectKind::A, Dialect::Quadrant { .. }) => Dialect::Support {
                    sigma_max: 1.0,
                    s_min: 0.4,
                    n_min: 1,
                },
                (DialectKind::B, Dialect::Quadrant { .. }) => config.dialect.clone(),
                (DialectKind::B, Dialect::Support { .. }) => Dialect::Quadrant {
                    c_min: 0.5,
                    delta: 0.01,
                    s_min: 0.0,
                    n_min: 1,
                },
            };
        }
        // `--future-span` has no independent config field: the dialect
        // fixes it (1 for Support, 2 for Quadrant). Accepted for
        // compatibility with §4.12's documented flag set and otherwise
        // ignored; `--dialect` is the flag that actually moves it.
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// run a full search and write the rule pool, progress, and (Dialect B) verification files
    Run {
        /// input CSV with one `X` column, one `T`/`timestamp` column, remaining columns as attributes
        #[arg(long)]
        input: PathBuf,
        /// TOML config file; falls back to `RunConfig::default()` if omitted
        #[arg(long)]
        config: Option<PathBuf>,
        /// directory receiving rule_pool.csv, progress.csv, and verification/*.csv
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
        #[command(flatten)]
        overrides: ConfigOverrides,
    },
    /// load an input file and config and report whether they are compatible, without searching
    Validate {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        overrides: ConfigOverrides,
    },
}

fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<RunConfig> {
    let mut config = match path {
        Some(path) => RunConfig::from_toml_file(path)?,
        None => RunConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn run(input: &Path, config_path: Option<&Path>, output_dir: &Path, overrides: &ConfigOverrides) -> Result<()> {
    let config = load_config(config_path, overrides)?;
    let dataset = load_csv(input)?;
    config.validate_against_row_count(dataset.len())?;

    std::fs::create_dir_all(output_dir).with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let mut pool = RulePool::new(config.rule_pool_max);
    let bar = progress(config.trial_count as u64);

    // Run trials sequentially here, rather than via `trial::run_trials_parallel`,
    // so each generation's report can stream into the progress file as it
    // completes. `run_trials_parallel` stays available as a library-level
    // batch mode for runs that value wall-clock time over a live progress feed.
    let mut progress_writer = ProgressWriter::create(&output_dir.join("progress.csv"))?;
    let mut reports = Vec::with_capacity(config.trial_count);
    for trial_id in config.trial_start_id..config.trial_start_id + config.trial_count {
        let report = trial::run_trial(trial_id, &dataset, &mut pool, &config, |generation_report| {
            if let Err(err) = progress_writer.write_row(generation_report) {
                log::warn!("failed to write progress row: {err:#}");
            }
        });
        bar.inc(1);
        log::info!(
            "trial {} ran {} generations, accepted {} rules (capacity stop: {})",
            report.trial_id,
            report.generations_run,
            report.accepted_by_this_trial,
            report.stopped_on_capacity
        );
        reports.push(report);
    }
    bar.finish_with_message("search complete");
    progress_writer.finish()?;

    write_rule_pool(&output_dir.join("rule_pool.csv"), &pool, &dataset, &config.dialect)?;

    if matches!(config.dialect, Dialect::Quadrant { .. }) {
        let verification_dir = output_dir.join("verification");
        std::fs::create_dir_all(&verification_dir)
            .with_context(|| format!("creating verification directory {}", verification_dir.display()))?;
        for (index, rule) in pool.rules().iter().enumerate() {
            write_verification(&verification_dir.join(format!("rule_{index:04}.csv")), rule, &dataset)?;
        }
    }

    println!(
        "{} {} rules accepted across {} trial(s)",
        "done:".green().bold(),
        pool.len(),
        reports.len()
    );
    Ok(())
}

fn validate(input: &Path, config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<()> {
    let config = load_config(config_path, overrides)?;
    let dataset = load_csv(input)?;
    config.validate_against_row_count(dataset.len())?;
    println!(
        "{} {} rows, {} attributes, dialect {:?}",
        "ok:".green().bold(),
        dataset.len(),
        dataset.width(),
        config.dialect
    );
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    match cli.command {
        Command::Run { input, config, output_dir, overrides } => run(&input, config.as_deref(), &output_dir, &overrides),
        Command::Validate { input, config, overrides } => validate(&input, config.as_deref(), &overrides),
    }
}
