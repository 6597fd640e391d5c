//! Configuration management module
//!
//! Handles loading, saving, and validation of benchmark configuration.
//! Values come from an optional TOML file; command-line flags override
//! them through the `with_*` setters.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::bench::RunnerSettings;
use crate::dataset::SizePreset;
use crate::models::result::detect_cpus;
use crate::models::Candidate;
use crate::{AwkBenchError, Result, APP_NAME, CONFIG_FILE};

const MAX_RUNS: usize = 1000;
const MAX_WARMUP: usize = 100;

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Markdown,
    Json,
    Csv,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 3] =
        [ReportFormat::Markdown, ReportFormat::Json, ReportFormat::Csv];
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportFormat::Markdown => "markdown",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        };
        f.write_str(name)
    }
}

impl FromStr for ReportFormat {
    type Err = AwkBenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(AwkBenchError::Config(format!(
                "Unknown report format: {} (use markdown, json, csv)",
                other
            ))),
        }
    }
}

/// Benchmark configuration structure containing all session parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Directory holding generated datasets
    pub data_dir: PathBuf,
    /// Directory scanned for `*.awk` programs
    pub program_dir: PathBuf,
    /// Directory reports are written to
    pub output_dir: PathBuf,
    /// Dataset size preset
    pub size: SizePreset,
    /// Measured runs per benchmark
    pub runs: usize,
    /// Discarded warmup runs per benchmark
    pub warmup: usize,
    /// Deadline for a single run, e.g. "5m" or "30s"
    #[serde(with = "humantime_duration")]
    pub timeout: Duration,
    /// Seed for dataset generation
    pub seed: u64,
    /// Candidate names to keep; empty keeps all
    pub candidates: Vec<String>,
    /// Report formats to write
    pub formats: Vec<ReportFormat>,
    /// Declared candidate set, in benchmark order
    pub declared: Vec<Candidate>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("testdata"),
            program_dir: PathBuf::from("programs"),
            output_dir: PathBuf::from("results"),
            size: SizePreset::Medium,
            runs: 5,
            warmup: 1,
            timeout: Duration::from_secs(5 * 60),
            seed: 42,
            candidates: Vec::new(),
            formats: ReportFormat::ALL.to_vec(),
            declared: Candidate::defaults(detect_cpus()),
        }
    }
}

impl BenchConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            return Err(AwkBenchError::Config(
                "Runs must be greater than 0".to_string(),
            ));
        }
        if self.runs > MAX_RUNS {
            return Err(AwkBenchError::Config(format!(
                "Too many runs: {} (max: {})",
                self.runs, MAX_RUNS
            )));
        }
        if self.warmup > MAX_WARMUP {
            return Err(AwkBenchError::Config(format!(
                "Too many warmup runs: {} (max: {})",
                self.warmup, MAX_WARMUP
            )));
        }
        if self.timeout.is_zero() {
            return Err(AwkBenchError::Config(
                "Timeout must be greater than 0".to_string(),
            ));
        }
        if self.formats.is_empty() {
            return Err(AwkBenchError::Config(
                "At least one report format is required".to_string(),
            ));
        }
        if self.declared.is_empty() {
            return Err(AwkBenchError::Config(
                "No candidates declared".to_string(),
            ));
        }
        let mut names = HashSet::new();
        if let Some(dup) = self.declared.iter().find(|c| !names.insert(c.name.as_str())) {
            return Err(AwkBenchError::Config(format!(
                "Duplicate candidate name: {}",
                dup.name
            )));
        }
        Ok(())
    }

    /// Settings for the benchmark orchestrator
    pub fn runner_settings(&self) -> RunnerSettings {
        RunnerSettings {
            timeout: self.timeout,
            warmup: self.warmup,
            runs: self.runs,
        }
    }

    /// Declared candidates narrowed by the name filter
    pub fn selected_candidates(&self) -> Vec<Candidate> {
        Candidate::select(&self.declared, &self.candidates)
    }

    pub fn with_data_dir(mut self, dir: PathBuf) -> Self {
        self.data_dir = dir;
        self
    }

    pub fn with_program_dir(mut self, dir: PathBuf) -> Self {
        self.program_dir = dir;
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    pub fn with_size(mut self, size: SizePreset) -> Self {
        self.size = size;
        self
    }

    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    pub fn with_warmup(mut self, warmup: usize) -> Self {
        self.warmup = warmup;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_candidates(mut self, names: Vec<String>) -> Self {
        self.candidates = names;
        self
    }

    pub fn with_formats(mut self, formats: Vec<ReportFormat>) -> Self {
        self.formats = formats;
        self
    }

    /// Load configuration from `path`, or from the standard config file
    /// location when `path` is `None`.
    /// Returns the default configuration if the file doesn't exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| {
            AwkBenchError::Config(format!(
                "Failed to read config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            AwkBenchError::Config(format!(
                "Failed to parse config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AwkBenchError::Config(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| {
            AwkBenchError::Config(format!(
                "Failed to write config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(())
    }

    /// Get the standard configuration file path
    /// Uses $CONFIG_HOME/awkbench/awkbench.toml
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            AwkBenchError::Config("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

/// Human-readable durations ("5m", "1m 30s") for serde
mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&humantime::format_duration(*duration))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
