use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use lota_core::stats::{AggregateError, run_configuration};
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{ResolvedOutputs, SweepConfig};
use crate::report::{ReportError, SweepReport, csv_header, csv_row};

/// Runs every configured card count and writes the sweep artifacts.
pub struct SweepRunner {
    config: SweepConfig,
    outputs: ResolvedOutputs,
    card_counts: Vec<usize>,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub configurations: usize,
    pub trials: usize,
    pub csv_path: PathBuf,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub plot_path: Option<PathBuf>,
    pub report: SweepReport,
}

impl SweepRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: SweepConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let card_counts = config.sweep.card_counts();
        if card_counts.is_empty() {
            return Err(RunnerError::EmptySweep);
        }

        Ok(Self {
            config,
            outputs,
            card_counts,
        })
    }

    pub fn card_counts(&self) -> &[usize] {
        &self.card_counts
    }

    /// Execute the sweep. The CSV report is echoed to `echo` row by row as
    /// each configuration finishes.
    pub fn run(&self, echo: &mut dyn Write) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.csv.parent())?;
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let trials = self.config.sweep.trials;
        let mut jsonl = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut report = SweepReport::new(self.config.run_id.clone(), trials);

        writeln!(echo, "{}", csv_header())?;

        for &card_count in &self.card_counts {
            let start = Instant::now();
            let stats = run_configuration(card_count, trials)?;
            let elapsed_ms = start.elapsed().as_secs_f64() * 1_000.0;

            event!(
                target: "lota_bench::sweep",
                Level::INFO,
                run_id = %self.config.run_id,
                card_count = card_count as u64,
                trials = trials as u64,
                mean_pick_turn = stats.pick.mean_turn.unwrap_or(f64::NAN),
                mean_line_turn = stats.line.mean_turn.unwrap_or(f64::NAN),
                mean_lota_turn = stats.lota.mean_turn.unwrap_or(f64::NAN),
                elapsed_ms
            );
            if stats.lota.resolved < stats.trials {
                event!(
                    target: "lota_bench::sweep",
                    Level::WARN,
                    card_count = card_count as u64,
                    unresolved = (stats.trials - stats.lota.resolved) as u64,
                    "lota not reached before the draw order ran out"
                );
            }

            writeln!(echo, "{}", csv_row(&stats))?;
            serde_json::to_writer(&mut jsonl, &stats)?;
            jsonl.write_all(b"\n")?;
            report.push(stats);
        }

        jsonl.flush()?;
        echo.flush()?;

        report.write_csv(&self.outputs.csv)?;
        report.write_markdown(&self.outputs.summary_md)?;
        let plot_path = match report.render_plot(&self.outputs.plots_dir) {
            Ok(path) => Some(path),
            Err(err) => {
                event!(
                    target: "lota_bench::sweep",
                    Level::WARN,
                    error = %err,
                    "plot skipped"
                );
                None
            }
        };

        Ok(RunSummary {
            configurations: report.rows.len(),
            trials,
            csv_path: self.outputs.csv.clone(),
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            plot_path,
            report,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize statistics row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("simulation failed: {0}")]
    Aggregate(#[from] AggregateError),
    #[error("report error: {0}")]
    Report(#[from] ReportError),
    #[error("sweep does not name any card count")]
    EmptySweep,
}
