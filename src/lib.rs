//! AWKBENCH - comparative AWK benchmark harness
//!
//! Runs several interchangeable AWK implementations against identical
//! inputs under a warmup/measurement protocol and reduces the timings to
//! comparative statistics and a cross-program ranking.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub mod bench;
pub mod config;
pub mod dataset;
pub mod models;
pub mod report;
pub mod telemetry;
pub mod util;

/// Failure of a single external run
#[derive(Debug, Error)]
pub enum ExecutionFailure {
    /// The executable could not be started
    #[error("failed to start process: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
    },
    /// The process ran but exited unsuccessfully
    #[error("{}: {stderr}", exit_label(.code))]
    NonZeroExit { code: Option<i32>, stderr: String },
    /// The process was killed after exceeding its deadline
    #[error("timed out after {}", timeout_label(.timeout))]
    TimedOut { timeout: Duration },
    /// Waiting on the process or draining its output failed
    #[error("I/O error while collecting output: {source}: {stderr}")]
    Output {
        #[source]
        source: std::io::Error,
        stderr: String,
    },
}

fn timeout_label(timeout: &Duration) -> String {
    humantime::format_duration(*timeout).to_string()
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

// Common error types
#[derive(Debug, Error)]
pub enum AwkBenchError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration validation or parsing error
    #[error("Configuration error: {0}")]
    Config(String),
    /// Dataset generation or inspection error
    #[error("Dataset error: {0}")]
    Dataset(String),
    /// Report rendering or writing error
    #[error("Report error: {0}")]
    Report(String),
    /// None of the declared candidates could be resolved on this host
    #[error("no AWK implementations found")]
    NoCandidates,
    /// The program directory holds no benchmark programs
    #[error("no AWK programs found in {}", .0.display())]
    NoPrograms(PathBuf),
    /// A candidate failed while benchmarking one program
    #[error("{candidate} failed on {program}: {source}")]
    Execution {
        candidate: String,
        program: String,
        #[source]
        source: ExecutionFailure,
    },
}

impl AwkBenchError {
    /// Whether the failure is confined to one candidate/program pair.
    /// Isolated failures are reported and the session moves on.
    pub fn is_isolated(&self) -> bool {
        matches!(self, AwkBenchError::Execution { .. })
    }
}

impl From<serde_json::Error> for AwkBenchError {
    fn from(err: serde_json::Error) -> Self {
        AwkBenchError::Report(format!("JSON serialization error: {}", err))
    }
}

impl From<csv::Error> for AwkBenchError {
    fn from(err: csv::Error) -> Self {
        AwkBenchError::Report(format!("CSV serialization error: {}", err))
    }
}

impl From<toml::de::Error> for AwkBenchError {
    fn from(err: toml::de::Error) -> Self {
        AwkBenchError::Config(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for AwkBenchError {
    fn from(err: toml::ser::Error) -> Self {
        AwkBenchError::Config(format!("TOML serialization error: {}", err))
    }
}

/// Result type alias for AWKBENCH operations
pub type Result<T> = std::result::Result<T, AwkBenchError>;

// Common constants
pub const APP_NAME: &str = "awkbench";
pub const CONFIG_FILE: &str = "awkbench.toml";
pub const PROGRAM_EXTENSION: &str = "awk";
pub const MARKDOWN_FILE: &str = "results.md";
pub const JSON_FILE: &str = "results.json";
pub const CSV_FILE: &str = "results.csv";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_zero_exit_mentions_stderr() {
        let failure = ExecutionFailure::NonZeroExit {
            code: Some(2),
            stderr: "syntax error at line 1".to_string(),
        };
        let msg = failure.to_string();
        assert!(msg.contains("exit status 2"));
        assert!(msg.contains("syntax error at line 1"));
    }

    #[test]
    fn test_timeout_message_is_human_readable() {
        let failure = ExecutionFailure::TimedOut {
            timeout: Duration::from_secs(90),
        };
        assert_eq!(failure.to_string(), "timed out after 1m 30s");
    }

    #[test]
    fn test_only_execution_errors_are_isolated() {
        let err = AwkBenchError::Execution {
            candidate: "gawk".into(),
            program: "sum.awk".into(),
            source: ExecutionFailure::TimedOut {
                timeout: Duration::from_secs(1),
            },
        };
        assert!(err.is_isolated());
        assert!(err.to_string().starts_with("gawk failed on sum.awk"));
        assert!(!AwkBenchError::NoCandidates.is_isolated());
        assert!(!AwkBenchError::Config("x".into()).is_isolated());
    }
}
