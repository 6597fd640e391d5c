//! Benchmark result data models
//!
//! Contains the outcome of a single external run, the aggregated
//! statistics for one candidate on one program, and ranking entries.

use crate::ExecutionFailure;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of exactly one external run
#[derive(Debug)]
pub struct RunOutcome {
    /// Candidate display name
    pub candidate: String,
    /// Program identifier
    pub program: String,
    /// Wall-clock time from spawn to exit (or kill)
    pub elapsed: Duration,
    /// Captured standard output
    pub output: String,
    /// Present iff the run did not complete successfully
    pub failure: Option<ExecutionFailure>,
}

impl RunOutcome {
    /// Whether the run completed successfully
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// The elapsed time of a successful run, or its failure
    pub fn into_elapsed(self) -> std::result::Result<Duration, ExecutionFailure> {
        match self.failure {
            Some(failure) => Err(failure),
            None => Ok(self.elapsed),
        }
    }
}

/// Statistical summary for one candidate on one program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    /// Candidate display name
    pub awk: String,
    /// Program identifier
    pub program: String,
    /// Number of measured runs
    pub runs: usize,
    #[serde(with = "duration_serde")]
    pub min: Duration,
    #[serde(with = "duration_serde")]
    pub max: Duration,
    #[serde(with = "duration_serde")]
    pub mean: Duration,
    #[serde(with = "duration_serde")]
    pub median: Duration,
    /// Population standard deviation
    #[serde(with = "duration_serde")]
    pub std_dev: Duration,
    /// Input MiB processed per second of mean run time
    pub throughput_mbps: f64,
}

impl AggregatedResult {
    /// Mean time relative to a baseline mean (1.0 = same speed)
    pub fn ratio_to(&self, baseline: Duration) -> f64 {
        if baseline.is_zero() {
            return 1.0;
        }
        self.mean.as_secs_f64() / baseline.as_secs_f64()
    }
}

/// A candidate's relative speed across every program in a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// Candidate display name
    pub awk: String,
    /// Geometric mean normalized to the fastest candidate (fastest = 1.0)
    pub score: f64,
    /// Geometric mean of the candidate's per-program means
    #[serde(with = "duration_serde")]
    pub geometric_mean: Duration,
    /// Number of programs the candidate completed
    pub programs: usize,
}

/// A candidate/program pair that could not be benchmarked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchFailure {
    pub awk: String,
    pub program: String,
    pub reason: String,
}

/// System information captured at benchmark time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system name
    pub os: String,
    /// CPU architecture
    pub arch: String,
    /// Logical CPUs available to the process
    pub cpus: usize,
    /// Version of this tool
    pub version: String,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            cpus: detect_cpus(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl SystemInfo {
    /// Create system info by detecting current system
    pub fn detect() -> Self {
        Self::default()
    }
}

/// Logical CPU count, falling back to 1 when it cannot be queried
pub fn detect_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

// Durations are stored as integer nanoseconds
pub(crate) mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_nanos() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = u64::deserialize(deserializer)?;
        Ok(Duration::from_nanos(nanos))
    }
}
