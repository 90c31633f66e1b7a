#![warn(missing_docs)]
//! brun CLI Library
//!
//! CLI infrastructure for benchmark binaries. Declare a [`BenchmarkSet`]
//! and hand it to [`run`] in your main function to get the full brun
//! experience: filtering, concurrent execution, tabulation and results
//! persistence.
//!
//! # Example
//!
//! ```no_run
//! use brun_core::{Benchmark, BenchmarkSet};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut set = BenchmarkSet::new();
//!     set.add(Benchmark::command("sort data.txt").with_entry("name", "sort"));
//!     brun_cli::run(&set)
//! }
//! ```

mod config;
mod filter;
mod results;

pub use config::{BrunConfig, OutputConfig, RunnerConfig};
pub use filter::{parse_filters, select, Filter, FilterError, FilterOp};
pub use results::write_results;

use brun_core::{Benchmark, BenchmarkSet, Engine, Record, RunConfig};
use brun_table::{column_names, Table};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// brun CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "brun")]
#[command(author, version, about = "brun - benchmark runner")]
pub struct Cli {
    /// Filter benchmarks (`key=value` or `key~substring`; repeatable,
    /// conjoined)
    #[arg(short = 'f', value_name = "FILTER")]
    pub filter: Vec<String>,

    /// Select columns
    #[arg(short = 'c', value_name = "COLUMN", num_args = 1..)]
    pub columns: Option<Vec<String>>,

    /// Hide columns (only when -c is not given)
    #[arg(short = 'H', value_name = "COLUMN", num_args = 1..)]
    pub hide: Option<Vec<String>>,

    /// Print declared benchmarks without executing
    #[arg(long)]
    pub list: bool,

    /// Transpose the output table
    #[arg(long)]
    pub transpose: bool,

    /// Pivot table: row field, column field, value field
    #[arg(long, num_args = 3, value_names = ["ROW", "COL", "VALUE"])]
    pub pivot: Option<Vec<String>>,

    /// Per-run timeout in seconds
    #[arg(long)]
    pub timeout: Option<f64>,

    /// Number of concurrent runs
    #[arg(long)]
    pub jobs: Option<usize>,

    /// Repeat each benchmark N times
    #[arg(long)]
    pub repeat: Option<usize>,

    /// Results file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the brun CLI against a declared benchmark set. This is the main
/// entry point for benchmark binaries.
pub fn run(set: &BenchmarkSet) -> anyhow::Result<()> {
    run_with_cli(set, Cli::parse())
}

/// Run the brun CLI with pre-parsed arguments.
pub fn run_with_cli(set: &BenchmarkSet, cli: Cli) -> anyhow::Result<()> {
    // Initialize logging (idempotent so embedding binaries can call run
    // more than once)
    let env_filter = if cli.verbose {
        "brun_core=debug,brun_cli=debug"
    } else {
        "brun_core=info,brun_cli=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init()
        .ok();

    // Discover brun.toml configuration (CLI flags override)
    let config = BrunConfig::discover().unwrap_or_default();

    let filters = parse_filters(&cli.filter)?;
    let selected: Vec<Benchmark> = select(set.benchmarks(), &filters)
        .into_iter()
        .cloned()
        .collect();

    tracing::debug!(
        declared = set.len(),
        selected = selected.len(),
        filters = filters.len(),
        "benchmark selection complete"
    );

    if selected.is_empty() {
        println!("No benchmarks to execute");
        return Ok(());
    }

    let records: Vec<Record> = if cli.list {
        selected.iter().map(|b| b.info().clone()).collect()
    } else {
        let run_config = RunConfig {
            jobs: cli.jobs.or(config.runner.jobs).unwrap_or(1),
            timeout: cli
                .timeout
                .or(config.runner.timeout)
                .map(Duration::from_secs_f64),
            repeat: cli.repeat.or(config.runner.repeat).unwrap_or(1),
        };
        Engine::new(run_config).run(&selected)
    };

    let table = build_table(&records, &cli);
    let table = if cli.transpose {
        table.transpose().unwrap_or_default()
    } else {
        table
    };
    println!();
    print!("{}", table.to_ascii());

    if !cli.list {
        let path = cli
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.output.results));
        write_results(&path, &records)?;
        println!("Full results written into '{}'", path.display());
    }

    Ok(())
}

/// Build the output table: a pivot when `--pivot` was given, otherwise a
/// straight dump over selected (or derived-minus-hidden) columns.
fn build_table(records: &[Record], cli: &Cli) -> Table {
    if let Some(fields) = &cli.pivot {
        return Table::pivot(records, &fields[0], &fields[1], &fields[2]);
    }
    match &cli.columns {
        Some(columns) => Table::from_records(records, Some(columns)),
        None => match &cli.hide {
            Some(hidden) => {
                let columns: Vec<String> = column_names(records)
                    .into_iter()
                    .filter(|name| !hidden.contains(name))
                    .collect();
                Table::from_records(records, Some(&columns))
            }
            None => Table::from_records(records, None),
        },
    }
}
