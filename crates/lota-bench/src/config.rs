use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_TRIALS: usize = 5_000;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root sweep configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SweepConfig {
    pub run_id: String,
    #[serde(default)]
    pub sweep: SweepPlan,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SweepConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: SweepConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.sweep.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            csv: resolve_template(&self.run_id, &self.outputs.csv),
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
            plots_dir: resolve_template(&self.run_id, &self.outputs.plots_dir),
        }
    }
}

/// Card counts to sweep and trials per card count.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SweepPlan {
    #[serde(default)]
    pub card_counts: Vec<usize>,
    #[serde(default)]
    pub ranges: Vec<CardRange>,
    #[serde(default = "default_trials")]
    pub trials: usize,
}

impl Default for SweepPlan {
    /// 1, 2, 5, then 10 through 250 in steps of 20.
    fn default() -> Self {
        Self {
            card_counts: vec![1, 2, 5],
            ranges: vec![CardRange {
                start: 10,
                end: 250,
                step: 20,
            }],
            trials: DEFAULT_TRIALS,
        }
    }
}

impl SweepPlan {
    /// Explicit counts first, then each range expanded in order.
    pub fn card_counts(&self) -> Vec<usize> {
        let mut counts = self.card_counts.clone();
        for range in &self.ranges {
            counts.extend(range.expand());
        }
        counts
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.trials == 0 {
            return Err(ValidationError::InvalidField {
                field: "sweep.trials".to_string(),
                message: "number of trials must be greater than zero".to_string(),
            });
        }

        for (index, range) in self.ranges.iter().enumerate() {
            range.validate(index)?;
        }

        let counts = self.card_counts();
        if counts.is_empty() {
            return Err(ValidationError::InvalidField {
                field: "sweep".to_string(),
                message: "at least one card count must be specified".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for count in counts {
            if count == 0 {
                return Err(ValidationError::InvalidField {
                    field: "sweep.card_counts".to_string(),
                    message: "card counts must be greater than zero".to_string(),
                });
            }
            if !seen.insert(count) {
                return Err(ValidationError::InvalidField {
                    field: "sweep".to_string(),
                    message: format!("card count {count} is swept more than once"),
                });
            }
        }

        Ok(())
    }
}

/// Inclusive arithmetic progression of card counts.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct CardRange {
    pub start: usize,
    pub end: usize,
    pub step: usize,
}

impl CardRange {
    pub fn expand(&self) -> impl Iterator<Item = usize> {
        (self.start..=self.end).step_by(self.step.max(1))
    }

    fn validate(&self, index: usize) -> Result<(), ValidationError> {
        if self.step == 0 {
            return Err(ValidationError::InvalidField {
                field: format!("sweep.ranges[{index}].step"),
                message: "step must be greater than zero".to_string(),
            });
        }

        if self.start == 0 || self.start > self.end {
            return Err(ValidationError::InvalidField {
                field: format!("sweep.ranges[{index}]"),
                message: "range must satisfy 0 < start <= end".to_string(),
            });
        }

        Ok(())
    }
}

fn default_trials() -> usize {
    DEFAULT_TRIALS
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub csv: String,
    pub jsonl: String,
    pub summary_md: String,
    pub plots_dir: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.csv", &self.csv),
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
            ("outputs.plots_dir", &self.plots_dir),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub csv: PathBuf,
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
    pub plots_dir: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
