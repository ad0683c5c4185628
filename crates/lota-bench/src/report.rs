use std::fs;
use std::path::{Path, PathBuf};

use lota_core::game::outcome::MilestoneKind;
use lota_core::stats::ConfigurationStats;
use plotters::prelude::*;
use serde::Serialize;
use thiserror::Error;

pub const CSV_HEADER: [&str; 12] = [
    "Boards",
    "First Pick Turns",
    "First Pick 90th",
    "First Pick Boards",
    "First Line Turns",
    "First Line 90th",
    "First Line Boards",
    "First Lota Turns",
    "First Lota 90th",
    "First Lota Boards",
    "First Line % >1 Board",
    "First Lota % >1 Board",
];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render plot: {0}")]
    Plot(String),
}

pub fn csv_header() -> String {
    CSV_HEADER.join(",")
}

/// One comma-separated row. Thresholds that never fired leave empty fields.
pub fn csv_row(stats: &ConfigurationStats) -> String {
    let mut fields = vec![stats.card_count.to_string()];
    for kind in MilestoneKind::ORDERED {
        let milestone = stats.milestone(kind);
        fields.push(optional(milestone.mean_turn));
        fields.push(optional(milestone.p90_turn));
        fields.push(optional(milestone.mean_winners));
    }
    fields.push(stats.line_collision_rate.to_string());
    fields.push(stats.lota_collision_rate.to_string());
    fields.join(",")
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Statistics rows for every card count of one sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub run_id: String,
    pub trials: usize,
    pub rows: Vec<ConfigurationStats>,
}

impl SweepReport {
    pub fn new(run_id: impl Into<String>, trials: usize) -> Self {
        Self {
            run_id: run_id.into(),
            trials,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, stats: ConfigurationStats) {
        self.rows.push(stats);
    }

    pub fn to_csv(&self) -> String {
        let mut out = csv_header();
        out.push('\n');
        for row in &self.rows {
            out.push_str(&csv_row(row));
            out.push('\n');
        }
        out
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        fs::write(path.as_ref(), self.to_csv()).map_err(|e| ReportError::Io {
            context: "writing statistics csv",
            source: e,
        })
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let mut rows = String::new();
        rows.push_str(&format!("# Lota Sweep Summary: {}\n\n", self.run_id));
        rows.push_str(&format!(
            "{} trials per card count. Turns are 1-based draw indices.\n\n",
            self.trials
        ));
        rows.push_str("| Cards | Pick mean | Pick p90 | Pick winners | Line mean | Line p90 | Line winners | Lota mean | Lota p90 | Lota winners | Line >1 | Lota >1 |\n");
        rows.push_str("|-------|-----------|----------|--------------|-----------|----------|--------------|-----------|----------|--------------|---------|---------|\n");

        for stats in &self.rows {
            let mut cells = vec![stats.card_count.to_string()];
            for kind in MilestoneKind::ORDERED {
                let milestone = stats.milestone(kind);
                cells.push(fixed(milestone.mean_turn, 2));
                cells.push(
                    milestone
                        .p90_turn
                        .map_or_else(|| "n/a".to_string(), |turn| turn.to_string()),
                );
                cells.push(fixed(milestone.mean_winners, 3));
            }
            cells.push(format!("{:.1}%", stats.line_collision_rate * 100.0));
            cells.push(format!("{:.1}%", stats.lota_collision_rate * 100.0));
            rows.push_str(&format!("| {} |\n", cells.join(" | ")));
        }

        let unresolved: Vec<String> = self
            .rows
            .iter()
            .filter(|stats| stats.lota.resolved < stats.trials)
            .map(|stats| {
                format!(
                    "- {} cards: Lota unresolved in {} of {} trials",
                    stats.card_count,
                    stats.trials - stats.lota.resolved,
                    stats.trials
                )
            })
            .collect();
        if !unresolved.is_empty() {
            rows.push_str("\n## Unresolved trials\n\n");
            rows.push_str(&unresolved.join("\n"));
            rows.push('\n');
        }

        fs::write(path.as_ref(), rows).map_err(|e| ReportError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }

    /// Plots mean turn per milestone against card count.
    pub fn render_plot(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ReportError> {
        let dir = dir.as_ref();
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).map_err(|e| ReportError::Io {
                context: "creating plots directory",
                source: e,
            })?;
        }

        if self.rows.is_empty() {
            return Err(ReportError::Plot("no rows to plot".into()));
        }

        let output_path = dir.join("mean_turns.png");
        let series: Vec<Vec<(f64, f64)>> = MilestoneKind::ORDERED
            .iter()
            .map(|&kind| {
                self.rows
                    .iter()
                    .filter_map(|stats| {
                        stats
                            .milestone(kind)
                            .mean_turn
                            .map(|turn| (stats.card_count as f64, turn))
                    })
                    .collect()
            })
            .collect();
        let max_cards = self
            .rows
            .iter()
            .map(|stats| stats.card_count)
            .max()
            .unwrap_or(1) as f64;

        let prev_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(|_| {}));

        let plot_attempt = std::panic::catch_unwind(move || {
            let root = BitMapBackend::new(&output_path, (800, 480)).into_drawing_area();
            root.fill(&WHITE)
                .map_err(|e| ReportError::Plot(e.to_string()))?;

            let mut chart = ChartBuilder::on(&root)
                .margin(20)
                .caption("Mean first turn by card count", ("sans-serif", 22))
                .set_label_area_size(LabelAreaPosition::Left, 50)
                .set_label_area_size(LabelAreaPosition::Bottom, 60)
                .build_cartesian_2d(0f64..max_cards.max(1.0), 0f64..90f64)
                .map_err(|e| ReportError::Plot(e.to_string()))?;

            chart
                .configure_mesh()
                .disable_mesh()
                .y_desc("Turn")
                .x_desc("Cards in play")
                .draw()
                .map_err(|e| ReportError::Plot(e.to_string()))?;

            for (points, color) in series.into_iter().zip([&GREEN, &BLUE, &RED]) {
                chart
                    .draw_series(LineSeries::new(points, color.stroke_width(2)))
                    .map_err(|e| ReportError::Plot(e.to_string()))?;
            }

            drop(chart);

            root.present()
                .map_err(|e| ReportError::Plot(e.to_string()))?;

            drop(root);

            Ok(output_path)
        });

        std::panic::set_hook(prev_hook);

        match plot_attempt {
            Ok(result) => result,
            Err(_) => Err(ReportError::Plot(
                "plotters panicked while rendering (missing font support?)".into(),
            )),
        }
    }
}

fn fixed(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{v:.precision$}"))
        .unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::{CSV_HEADER, SweepReport, csv_header, csv_row};
    use lota_core::stats::{ConfigurationStats, MilestoneStats};
    use tempfile::tempdir;

    fn milestone(mean_turn: Option<f64>, p90_turn: Option<u32>, resolved: usize) -> MilestoneStats {
        MilestoneStats {
            mean_turn,
            p90_turn,
            mean_winners: mean_turn.map(|_| 1.5),
            resolved,
        }
    }

    fn sample_stats() -> ConfigurationStats {
        ConfigurationStats {
            card_count: 5,
            trials: 4,
            pick: milestone(Some(1.25), Some(2), 4),
            line: milestone(Some(18.5), Some(24), 4),
            lota: milestone(None, None, 0),
            line_collision_rate: 0.25,
            lota_collision_rate: 0.0,
        }
    }

    #[test]
    fn header_matches_column_count() {
        assert_eq!(csv_header().split(',').count(), CSV_HEADER.len());
        assert!(csv_header().starts_with("Boards,First Pick Turns"));
    }

    #[test]
    fn row_formats_values_and_leaves_missing_fields_empty() {
        let row = csv_row(&sample_stats());
        assert_eq!(row, "5,1.25,2,1.5,18.5,24,1.5,,,,0.25,0");
        assert_eq!(row.split(',').count(), CSV_HEADER.len());
    }

    #[test]
    fn writes_csv_and_markdown() {
        let dir = tempdir().expect("temp dir");
        let mut report = SweepReport::new("unit", 4);
        report.push(sample_stats());

        let csv_path = dir.path().join("stats.csv");
        report.write_csv(&csv_path).expect("csv written");
        let csv = std::fs::read_to_string(&csv_path).expect("csv readable");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], csv_header());

        let md_path = dir.path().join("summary.md");
        report.write_markdown(&md_path).expect("markdown written");
        let markdown = std::fs::read_to_string(&md_path).expect("markdown readable");
        assert!(markdown.contains("| 5 | 1.25 | 2 | 1.500 |"));
        assert!(markdown.contains("Lota unresolved in 4 of 4 trials"));
    }
}
