//! Branch prediction simulator CLI.
//!
//! This binary provides a single entry point for trace-driven evaluation. It performs:
//! 1. **Run:** Replay synthetic workloads or a JSON trace through one predictor configuration.
//! 2. **Sweep:** Replay every workload through every preset and print a comparison table.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use bpsim_core::PredictorConfig;
use bpsim_core::sim::loader;
use bpsim_core::sim::trace::{BranchRecord, DEFAULT_ITERATIONS, Workload};
use bpsim_core::sim::Simulator;
use bpsim_core::stats::BranchStats;

#[derive(Parser, Debug)]
#[command(
    name = "bpsim",
    author,
    version,
    about = "Branch prediction unit simulator",
    long_about = "Replay branch traces through bimodal, gshare, two-level, perceptron and BTB predictors.\n\nExamples:\n  bpsim run --preset per-b\n  bpsim run --config gshare.json --workload correlated\n  bpsim run --preset twolevel --trace trace.json --json\n  bpsim sweep --iterations 40"
)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay workloads or a trace through one predictor.
    Run {
        /// JSON predictor configuration.
        #[arg(short, long, conflicts_with = "preset")]
        config: Option<PathBuf>,

        /// Built-in preset (btb, bimodal, gshare, gshare-folded, gshare-btb, twolevel, per-t, per-b).
        #[arg(short, long)]
        preset: Option<String>,

        /// Workload name, or "all".
        #[arg(short, long, default_value = "all")]
        workload: String,

        /// Invocations of each workload kernel.
        #[arg(short, long, default_value_t = DEFAULT_ITERATIONS)]
        iterations: usize,

        /// JSON trace to replay instead of the synthetic workloads.
        #[arg(short, long)]
        trace: Option<PathBuf>,

        /// Print statistics as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Run every preset over every workload.
    Sweep {
        /// Invocations of each workload kernel.
        #[arg(short, long, default_value_t = DEFAULT_ITERATIONS)]
        iterations: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            config,
            preset,
            workload,
            iterations,
            trace,
            json,
        } => cmd_run(
            config.as_deref(),
            preset.as_deref(),
            &workload,
            iterations,
            trace.as_deref(),
            json,
        ),
        Commands::Sweep { iterations } => cmd_sweep(iterations),
    };

    if let Err(msg) = result {
        eprintln!("Error: {msg}");
        process::exit(1);
    }
}

/// Installs the fmt subscriber; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves the configuration from a file, a preset, or the defaults.
fn resolve_config(config: Option<&Path>, preset: Option<&str>) -> Result<PredictorConfig, String> {
    match (config, preset) {
        (Some(path), _) => loader::load_config(path).map_err(|e| e.to_string()),
        (None, Some(name)) => PredictorConfig::preset(name).map_err(|e| e.to_string()),
        (None, None) => Ok(PredictorConfig::default()),
    }
}

/// Resolves the workloads named on the command line.
fn resolve_workloads(name: &str) -> Result<Vec<Workload>, String> {
    if name.eq_ignore_ascii_case("all") {
        Ok(Workload::ALL.to_vec())
    } else {
        Ok(vec![name.parse()?])
    }
}

/// Replays workloads or a trace through one predictor and prints the statistics.
fn cmd_run(
    config: Option<&Path>,
    preset: Option<&str>,
    workload: &str,
    iterations: usize,
    trace: Option<&Path>,
    json: bool,
) -> Result<(), String> {
    let config = resolve_config(config, preset)?;
    debug!(%config, "configuration resolved");

    let traces: Vec<(String, Vec<BranchRecord>)> = match trace {
        Some(path) => {
            let records = loader::load_trace(path).map_err(|e| e.to_string())?;
            vec![(path.display().to_string(), records)]
        }
        None => resolve_workloads(workload)?
            .into_iter()
            .map(|w| (w.name().to_string(), w.generate(iterations)))
            .collect(),
    };

    for line in render_run(&config, &traces, json)? {
        println!("{line}");
    }
    Ok(())
}

/// Runs each trace through a fresh simulator and formats the results.
///
/// In JSON mode every line is one JSON object, with no banner or totals.
fn render_run(
    config: &PredictorConfig,
    traces: &[(String, Vec<BranchRecord>)],
    json: bool,
) -> Result<Vec<String>, String> {
    let mut lines = Vec::new();
    if !json {
        lines.push(format!("Configuration: {config}"));
    }
    let mut total = BranchStats::default();
    for (name, records) in traces {
        let mut sim = Simulator::new(config).map_err(|e| e.to_string())?;
        let stats = sim.run(records);
        total.merge(&stats);
        if json {
            let out = serde_json::json!({
                "predictor": config.label(),
                "workload": name,
                "stats": stats,
                "misprediction_rate": stats.misprediction_rate(),
            });
            lines.push(out.to_string());
        } else {
            lines.push(stats.report(name));
        }
    }
    if traces.len() > 1 && !json {
        lines.push(total.report("all workloads"));
    }
    Ok(lines)
}

/// Replays every workload through every preset and prints a summary table.
fn cmd_sweep(iterations: usize) -> Result<(), String> {
    let traces: Vec<(Workload, Vec<BranchRecord>)> = Workload::ALL
        .into_iter()
        .map(|w| (w, w.generate(iterations)))
        .collect();

    let mut rows = Vec::new();
    for preset in PredictorConfig::PRESETS {
        let config = PredictorConfig::preset(preset).map_err(|e| e.to_string())?;
        for (workload, records) in &traces {
            let mut sim = Simulator::new(&config).map_err(|e| e.to_string())?;
            let stats = sim.run(records);
            rows.push((*preset, *workload, stats));
        }
    }

    println!("\n{}", "=".repeat(64));
    println!(
        "{:<15} | {:<14} | {:<10} | {:<10}",
        "Predictor", "Workload", "Branches", "Mispred %"
    );
    println!("{}", "-".repeat(64));
    for (preset, workload, stats) in rows {
        println!(
            "{:<15} | {:<14} | {:<10} | {:<10.2}",
            preset,
            workload.name(),
            stats.branches,
            stats.misprediction_rate()
        );
    }
    println!("{}", "=".repeat(64));
    Ok(())
}
