#![warn(missing_docs)]
//! Steadybench CLI Library
//!
//! Command-line front end that times external commands until their
//! uncertainty is small enough. Every flag overrides the matching setting
//! from a discovered `steadybench.toml`.
//!
//! # Example
//!
//! ```text
//! steadybench -p 0.01 -- ./my-program --input data.txt
//! steadybench --shell 'sort big.txt > /dev/null' --shell 'sort -n big.txt > /dev/null'
//! ```

mod config;

pub use config::*;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use steadybench_core::{BenchConfig, Benchmark, CommandInstance, VariabilityMeasure};
use steadybench_report::{OutputFormat, build_report};
use tracing_subscriber::EnvFilter;

/// Steadybench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "steadybench")]
#[command(author, version, about = "Steadybench - robust timing of repeatable commands")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Optional subcommand; without one the given command is benchmarked
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Program and arguments to benchmark
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub cmd: Vec<String>,

    /// Shell script to benchmark via `sh -c` (repeatable)
    #[arg(long, value_name = "SCRIPT")]
    pub shell: Vec<String>,

    /// Target relative precision (0.05 = 5%)
    #[arg(short = 'p', long = "precision")]
    pub precision: Option<f64>,

    /// Target absolute precision in seconds
    #[arg(short = 'a', long = "absprecision")]
    pub abs_precision: Option<f64>,

    /// Number of initial runs before convergence is checked
    #[arg(short = 'i', long = "initial")]
    pub initial: Option<usize>,

    /// Maximum number of runs per pass
    #[arg(short = 'm', long = "maxiter")]
    pub max_iterations: Option<usize>,

    /// Outlier cut in units of the spread; 0 disables rejection
    #[arg(long)]
    pub outlier_rejection: Option<f64>,

    /// Spread estimator: mad or std-dev
    #[arg(long)]
    pub variability: Option<VariabilityMeasure>,

    /// Skip the dry run and report uncorrected timings
    #[arg(long)]
    pub no_dry_run: bool,

    /// Program used for dry runs of plain commands
    #[arg(long, value_name = "PROGRAM")]
    pub dry_command: Option<String>,

    /// Print unrounded `value uncertainty` pairs
    #[arg(long)]
    pub raw: bool,

    /// Output format: human, raw, json
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Let benchmarked commands write to the terminal
    #[arg(long)]
    pub show_output: bool,

    /// Configuration file (defaults to a discovered steadybench.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase diagnostic output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a default steadybench.toml
    Init,
}

impl Cli {
    /// Apply command-line overrides on top of file configuration
    pub fn apply_overrides(&self, mut config: BenchConfig) -> BenchConfig {
        if let Some(p) = self.precision {
            config.target_rel_precision = p;
        }
        if let Some(a) = self.abs_precision {
            config.target_abs_precision = a;
        }
        if let Some(i) = self.initial {
            config.initial_runs = i;
        }
        if let Some(m) = self.max_iterations {
            config.max_iterations = m;
        }
        if let Some(k) = self.outlier_rejection {
            config.outlier_rejection = k;
        }
        if let Some(v) = self.variability {
            config.variability_measure = v;
        }
        if self.no_dry_run {
            config.dry_run = false;
        }
        config.verbosity = config.verbosity.max(self.verbose);
        config
    }

    /// Resolve the output format from flags and file settings
    pub fn output_format(&self, output: &OutputConfig) -> anyhow::Result<OutputFormat> {
        if self.raw || (self.format.is_none() && output.raw) {
            return Ok(OutputFormat::Raw);
        }
        let format = self.format.as_deref().unwrap_or(&output.format);
        format.parse().map_err(|e: String| anyhow::anyhow!(e))
    }

    /// Build the command instances to measure, in command-line order
    pub fn instances(&self) -> Vec<CommandInstance> {
        let mut instances: Vec<CommandInstance> = self
            .shell
            .iter()
            .map(|script| CommandInstance::shell(script.as_str()))
            .collect();

        if !self.cmd.is_empty() {
            let mut command = CommandInstance::new(self.cmd.iter().map(String::as_str));
            if let Some(dry) = &self.dry_command {
                command = command.with_dry_command(dry.split_whitespace());
            }
            instances.push(command);
        }

        instances
            .into_iter()
            .map(|instance| instance.with_output(self.show_output))
            .collect()
    }
}

/// Run the Steadybench CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the Steadybench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    if let Some(Commands::Init) = cli.command {
        print!("{}", SteadyConfig::default_toml());
        return Ok(());
    }

    let file_config = match &cli.config {
        Some(path) => SteadyConfig::load(path)?,
        None => SteadyConfig::discover()?.unwrap_or_default(),
    };
    let config = cli.apply_overrides(file_config.runner);

    init_logging(config.verbosity);

    let format = cli.output_format(&file_config.output)?;
    let instances = cli.instances();
    if instances.is_empty() {
        anyhow::bail!("No command given. Pass a command after `--` or use --shell");
    }

    let mut bench = Benchmark::new(config)?;
    for instance in instances {
        bench.add(instance)?;
    }

    let start = Instant::now();
    run_benchmarks(&mut bench)?;
    let total_duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    let report = build_report(&bench, total_duration_ms);
    let output = format.render(&report)?;

    if let Some(ref path) = cli.output {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        file.write_all(output.as_bytes())?;
        println!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    Ok(())
}

/// Verbosity 0 shows warnings only; each level adds one step of detail.
/// `RUST_LOG` wins when set.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("steadybench={}", level)));

    // A subscriber may already be installed when embedded in another binary
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_benchmarks(bench: &mut Benchmark) -> anyhow::Result<()> {
    let pb = ProgressBar::new(bench.instances().len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let result = bench.run_with(|measured| {
        pb.set_message(measured.name().to_string());
        pb.inc(1);
    });

    pb.finish_and_clear();
    result?;
    Ok(())
}
