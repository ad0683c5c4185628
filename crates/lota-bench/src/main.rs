use std::io;
use std::path::PathBuf;

use clap::Parser;

use lota_bench::config::{ResolvedOutputs, SweepConfig};
use lota_bench::logging::init_logging;
use lota_bench::sweep::SweepRunner;

/// Monte Carlo sweep of Lota win thresholds over card counts.
#[derive(Debug, Parser)]
#[command(
    name = "lota-bench",
    author,
    version,
    about = "Estimate Pick/Line/Lota turns for a sweep of card counts"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/lota.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of trials per card count.
    #[arg(long, value_name = "TRIALS")]
    trials: Option<usize>,

    /// Replace the configured sweep with these card counts (comma separated).
    #[arg(long, value_name = "COUNTS", value_delimiter = ',')]
    card_counts: Option<Vec<usize>>,

    /// Exit after validating the configuration (no sweep is run).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SweepConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(trials) = cli.trials {
        config.sweep.trials = trials;
    }

    if let Some(card_counts) = cli.card_counts {
        config.sweep.card_counts = card_counts;
        config.sweep.ranges.clear();
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let configurations = config.sweep.card_counts().len();
    let trials = config.sweep.trials;

    eprintln!(
        "Loaded configuration '{run_id}' with {configurations} card count{} ({trials} trials each)",
        if configurations == 1 { "" } else { "s" }
    );

    let logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = SweepRunner::new(config, outputs)?;

    if cli.validate_only {
        eprintln!("Validation-only mode: sweep execution skipped.");
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    let summary = runner.run(&mut stdout)?;
    eprintln!(
        "Sweep complete for '{run_id}': {} configurations × {} trials",
        summary.configurations, summary.trials
    );
    eprintln!("Statistics CSV: {}", summary.csv_path.display());
    eprintln!("Statistics JSONL: {}", summary.jsonl_path.display());
    eprintln!("Summary table: {}", summary.summary_path.display());
    if let Some(plot_path) = summary.plot_path.as_ref() {
        eprintln!("Mean turn plot: {}", plot_path.display());
    }
    if let Some(guard) = logging_guard.as_ref() {
        eprintln!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
