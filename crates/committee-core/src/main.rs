//! Committee Deliberation Simulator
//!
//! Runs a committee of doctors arguing towards a diagnosis, either once with
//! a per-round trace or as a seeded batch sweep over committee sizes.

use clap::{Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::PathBuf;
use thiserror::Error;

use committee_core::batch::BatchRunner;
use committee_core::config::{default_config_toml, CommitteeConfig, ConfigError};
use committee_core::output::{write_batch_report, OutputError, SnapshotWriter};
use committee_core::scenario::{zika_chikungunya_briefing, Preset};
use committee_core::simulation::Simulation;
use committee_events::BatchReport;

/// Command line arguments for the simulator
#[derive(Parser, Debug)]
#[command(name = "committee_sim")]
#[command(about = "A medical committee deliberation simulator")]
struct Args {
    /// Configuration file (falls back to committee.toml, then defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Random seed, overriding the configured one
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Number of rounds, overriding the configured one
    #[arg(long, global = true)]
    rounds: Option<u64>,

    /// Default log filter; RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single deliberation
    Run {
        /// Write captured snapshots as JSONL
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Sweep committee sizes with independent seeded runs
    Batch {
        /// Write the report as JSON instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the default configuration
    InitConfig,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.as_str().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = execute(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn execute(args: Args) -> Result<(), CliError> {
    if let Command::InitConfig = args.command {
        print!("{}", default_config_toml());
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => CommitteeConfig::load(path)?,
        None => CommitteeConfig::load_or_default(),
    };
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
        config.batch.base_seed = seed;
    }
    if let Some(rounds) = args.rounds {
        config.simulation.rounds = rounds;
        config.batch.rounds = rounds;
    }

    match args.command {
        Command::Run { output } => run_single(&config, output),
        Command::Batch { output } => run_batch(config, output),
        Command::InitConfig => Ok(()),
    }
}

fn run_single(config: &CommitteeConfig, output: Option<PathBuf>) -> Result<(), CliError> {
    let rounds = config.simulation.rounds;
    let interval = config.simulation.snapshot_interval;

    println!("Committee Deliberation");
    println!("======================");
    println!("Seed: {}", config.simulation.seed);
    println!("Rounds: {}", rounds);
    println!("Preset: {:?}", config.committee.preset);
    println!("Activation: {:?}", config.simulation.activation);
    println!();
    if config.committee.preset == Preset::Default {
        print!("{}", zika_chikungunya_briefing());
        println!();
    }

    let mut rng = SmallRng::seed_from_u64(config.simulation.seed);
    let setup = config.build_setup(&mut rng)?;
    let mut sim = Simulation::new(setup, rng).map_err(ConfigError::from)?;

    let mut writer = match &output {
        Some(path) => SnapshotWriter::new(path, interval)?,
        None => SnapshotWriter::null(interval),
    };

    let baseline = sim.snapshot();
    writer.capture(&baseline, rounds)?;
    println!(
        "Round {:>4}: {} (p = {:.4})",
        0,
        baseline.decision,
        baseline.decision_probability()
    );

    for _ in 0..rounds {
        let report = sim.step();
        writer.capture(&report.snapshot, rounds)?;

        let marker = if report.decision_changed() {
            tracing::info!(
                round = report.round,
                from = %report.previous_decision,
                to = %report.snapshot.decision,
                "decision changed"
            );
            " *"
        } else {
            ""
        };
        println!(
            "Round {:>4}: {} (p = {:.4}, {} influences, {} clamped, shift {:.4}){}",
            report.round,
            report.snapshot.decision,
            report.snapshot.decision_probability(),
            report.influences.len(),
            report.clamped_count(),
            report.total_shift(),
            marker
        );
    }
    writer.flush()?;

    println!();
    println!("Final diagnosis after {} rounds: {}", sim.round(), sim.decision());
    for (conclusion, p) in &sim.diagnosis().probabilities {
        println!("  {:<16} {:.4}", conclusion, p);
    }
    println!("Average beliefs:");
    for (label, avg) in sim.arguments().iter().zip(sim.average_beliefs()) {
        match avg {
            Some(value) => println!("  {:<16} {:.4}", label, value),
            None => println!("  {:<16} unknown", label),
        }
    }
    if let Some(path) = output {
        println!();
        println!("Snapshots ({}) written to {}", writer.written(), path.display());
    }

    Ok(())
}

fn run_batch(config: CommitteeConfig, output: Option<PathBuf>) -> Result<(), CliError> {
    let runner = BatchRunner::new(config);
    eprintln!("Running {} simulations...", runner.run_count());
    let report = runner.run()?;

    match output {
        Some(path) => {
            write_batch_report(&path, &report)?;
            print_batch_summary(&report);
            println!();
            println!("Report written to {}", path.display());
        }
        None => println!("{}", report.to_json_pretty().map_err(OutputError::from)?),
    }

    Ok(())
}

fn print_batch_summary(report: &BatchReport) {
    println!("Batch Summary");
    println!("=============");
    for group in &report.groups {
        let decisions: Vec<String> = group
            .decision_counts
            .iter()
            .map(|(decision, count)| format!("{} x{}", decision, count))
            .collect();
        print!(
            "{:>3} doctors: {} runs, {}, mean p = {:.4}, settles by round {:.1}",
            group.agent_count,
            group.runs,
            decisions.join(", "),
            group.mean_decision_probability,
            group.mean_last_change_round
        );
        match group.accuracy {
            Some(accuracy) => println!(", accuracy {:.1}%", accuracy * 100.0),
            None => println!(),
        }
    }
}
