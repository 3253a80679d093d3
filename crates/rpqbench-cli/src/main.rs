//! rpq-bench - Regular path query benchmark.
//!
//! Runs every query of a query directory against a label-partitioned
//! dataset, several times, and records latency and answer size per run.

mod output;

use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use rpqbench_common::Error;
use rpqbench_core::ProductSolver;
use rpqbench_engine::{BenchConfig, run_benchmark};
use tracing::{Level, debug};

/// Regular path query benchmark.
///
/// Loads `<dataset_dir>/<label>.txt` for labels `1..=label_count` and the
/// queries `<query_dir>/<n>/meta.txt` for `n` in `1..=query_count`, then
/// prints `query,elapsed_us,cardinality` for every run.
#[derive(Parser, Debug)]
#[command(name = "rpq-bench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding one Matrix Market file per label
    dataset_dir: PathBuf,

    /// Number of labels in the dataset
    label_count: usize,

    /// Directory holding one subdirectory per query
    query_dir: PathBuf,

    /// Number of queries
    query_count: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable solver diagnostic tracing
    #[arg(short = 'g', long = "profile")]
    profile: bool,

    /// Number of measured runs
    #[arg(short, long, default_value_t = BenchConfig::DEFAULT_RUNS)]
    runs: usize,

    /// Disable the warm-up run
    #[arg(short = 'x', long = "no-warmup")]
    no_warmup: bool,

    /// Load labels on demand instead of all at start
    #[arg(short = 'p', long = "no-preload")]
    no_preload: bool,

    /// Do not cache transposed matrices
    #[arg(short = 't', long = "no-transpose")]
    no_transpose: bool,

    /// Directory receiving the result files
    #[arg(long, default_value = BenchConfig::DEFAULT_RESULTS_DIR)]
    results_dir: PathBuf,
}

impl Cli {
    fn config(&self) -> BenchConfig {
        BenchConfig::new(
            self.dataset_dir.clone(),
            self.label_count,
            self.query_dir.clone(),
            self.query_count,
        )
        .with_runs(self.runs)
        .with_warmup(!self.no_warmup)
        .with_preload(!self.no_preload)
        .with_transpose_cache(!self.no_transpose)
        .with_solver_tracing(self.profile)
        .with_results_dir(self.results_dir.clone())
    }

    fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.profile {
            Level::INFO
        } else {
            Level::WARN
        }
    }
}

/// Parses arguments, exiting on anything that is not a runnable command
/// line.
fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                process::exit(0);
            }
            ErrorKind::UnknownArgument => {
                let _ = e.print();
                process::exit(1);
            }
            _ => {
                let _ = Cli::command().print_help();
                process::exit(0);
            }
        },
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.config();
    debug!(?config, "starting benchmark");

    let solver = ProductSolver::with_tracing(config.trace_solver);
    let (report, _) = run_benchmark(config.clone(), solver, io::stdout())?;

    if cli.verbose {
        output::print_run_summary(&config, &report);
    }
    Ok(())
}

fn main() {
    let cli = parse_args();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        match e.downcast_ref::<Error>() {
            Some(err) => eprintln!("Error in {}(): {err}", err.operation()),
            None => eprintln!("Error: {e:#}"),
        }
        process::exit(-1);
    }
}
