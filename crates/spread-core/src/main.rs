//! Belief Spread Simulator
//!
//! Loads a scenario, primes every agent at time zero, runs the configured
//! number of steps, and writes one JSONL snapshot per reported step.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use spread_core::config::{SimConfig, DEFAULT_CONFIG_PATH};
use spread_core::output::{RunReporter, SnapshotLogger};
use spread_core::{Scenario, SimError};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "bspread")]
#[command(about = "Simulates belief and behaviour diffusion in a social network")]
struct Args {
    /// Scenario file describing behaviours, beliefs, and agents
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Configuration file (defaults apply when absent)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of steps to simulate after time zero
    #[arg(long)]
    steps: Option<u64>,

    /// Snapshot output path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Evaluate agents one at a time instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn load_config(args: &Args) -> Result<SimConfig, SimError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                SimConfig::from_file(&default_path)?
            } else {
                SimConfig::default()
            }
        }
    };

    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(steps) = args.steps {
        config.simulation.steps = steps;
    }
    if let Some(output) = &args.output {
        config.output.snapshot_path = output.clone();
    }
    if args.sequential {
        config.simulation.parallel = false;
    }

    Ok(config)
}

fn run(args: &Args) -> Result<(), SimError> {
    let config = load_config(args)?;

    if args.print_default_config {
        println!("{}", SimConfig::default().to_toml()?);
        return Ok(());
    }

    let scenario = match &args.scenario {
        Some(path) => Scenario::from_file(path)?,
        None => {
            tracing::warn!("no scenario given, running an empty population");
            Scenario::default()
        }
    };

    tracing::info!(
        seed = config.simulation.seed,
        steps = config.simulation.steps,
        parallel = config.simulation.parallel,
        "starting simulation"
    );

    let mut population = scenario.build(config.settings())?;
    population.prime();

    let output = &config.output;
    let logger = SnapshotLogger::new(&output.snapshot_path)?;
    let mut reporter = RunReporter::new(logger, config.simulation.seed, output);

    reporter.observe(&population)?;
    population.run(config.simulation.steps, |p| reporter.observe(p))?;

    let snapshots = reporter.snapshot_count();
    let summary = reporter.finish()?;
    tracing::info!(
        time = %population.now(),
        snapshots,
        path = %output.snapshot_path.display(),
        "simulation complete"
    );

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
