//! The thin binary: resolves CLI arguments and file paths, wires `hsf::io`
//! into `hsf::analyzer` and `hsf::simulator`, and writes the two reports.
//! Everything that touches the filesystem or the process environment lives
//! here; the library never does.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use hsf::{analyzer, io, simulator};

/// Analyzes and simulates a hierarchical real-time workload.
#[derive(Debug, Parser)]
#[command(name = "hsf-cli", version, about)]
struct Args {
    /// Path to the architecture table (core_id, speed_factor, scheduler).
    architecture_file: PathBuf,
    /// Path to the budgets table (component_id, scheduler, budget, period, core_id, priority).
    budgets_file: PathBuf,
    /// Path to the tasks table (task_name, wcet, period, component_id, priority).
    tasks_file: PathBuf,

    /// Where to write the analyzer report.
    #[arg(long, default_value = "analyzer_report.csv")]
    analyzer_output: PathBuf,
    /// Where to write the simulator report.
    #[arg(long, default_value = "simulator_report.csv")]
    simulator_output: PathBuf,

    /// How many full system hyperperiods to simulate.
    #[arg(long, default_value_t = simulator::SimConfig::default().hyperperiod_cap)]
    hyperperiod_cap: u32,
    /// The execution-time sampler's lower bound, as a fraction of wcet.
    #[arg(long, default_value_t = simulator::SimConfig::default().lower_bound_fraction)]
    lower_bound_fraction: f64,
    /// The execution-time sampler's RNG seed.
    #[arg(long, default_value_t = simulator::SimConfig::default().seed)]
    seed: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("hsf-cli: {err}");
            eprintln!(
                "usage: hsf-cli <architecture-file> <budgets-file> <tasks-file> [options]"
            );
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let workload =
        io::read_workload(&args.architecture_file, &args.budgets_file, &args.tasks_file)?;

    tracing::info!(
        cores = workload.cores.len(),
        components = workload.components.len(),
        tasks = workload.tasks.len(),
        "loaded workload"
    );

    let verdict = analyzer::analyze(&workload);
    tracing::info!(schedulable = verdict.schedulable, "analyzer finished");
    let (component_rows, core_rows) = io::analyzer_rows(&verdict);
    io::write_csv(&args.analyzer_output, &component_rows)?;
    io::write_csv(&args.analyzer_output.with_extension("cores.csv"), &core_rows)?;

    let config = simulator::SimConfig {
        hyperperiod_cap: args.hyperperiod_cap,
        lower_bound_fraction: args.lower_bound_fraction,
        seed: args.seed,
    };
    let report = simulator::run(workload, config);
    if !report.completed_naturally {
        tracing::warn!("simulation hit the hyperperiod cap before every queue drained");
    }
    let simulator_rows = io::simulator_rows(&report);
    io::write_csv(&args.simulator_output, &simulator_rows)?;

    Ok(())
}
