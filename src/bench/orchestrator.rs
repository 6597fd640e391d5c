//! Warmup and measurement protocol
//!
//! Drives warmup and measured runs of one candidate on one program,
//! strictly one after another, and aggregates the measured samples.
//! The first failing run, warmup or measured, aborts the benchmark.

use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::bench::executor::{Executor, Program};
use crate::bench::stats::aggregate;
use crate::models::{AggregatedResult, Candidate};
use crate::{AwkBenchError, Result};

/// Repetition and deadline settings for each benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerSettings {
    /// Deadline for a single run
    pub timeout: Duration,
    /// Runs whose timings are discarded
    pub warmup: usize,
    /// Runs whose timings are aggregated
    pub runs: usize,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5 * 60),
            warmup: 1,
            runs: 5,
        }
    }
}

/// Benchmark orchestrator over an [`Executor`]
pub struct BenchmarkRunner<E> {
    executor: E,
    settings: RunnerSettings,
}

impl<E: Executor> BenchmarkRunner<E> {
    pub fn new(executor: E, settings: RunnerSettings) -> Self {
        Self { executor, settings }
    }

    pub fn settings(&self) -> &RunnerSettings {
        &self.settings
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Warm up, measure and aggregate `candidate` on `program`.
    ///
    /// Any failed run aborts immediately with [`AwkBenchError::Execution`];
    /// partial samples are never aggregated. Nothing is retried.
    pub async fn benchmark(
        &self,
        candidate: &Candidate,
        program: &Program,
        input: &Path,
        input_size: u64,
    ) -> Result<AggregatedResult> {
        if self.settings.runs == 0 {
            return Err(AwkBenchError::Config(
                "At least one measured run is required".to_string(),
            ));
        }

        for i in 0..self.settings.warmup {
            debug!(awk = %candidate.name, program = %program.id(), iteration = i, "warmup");
            self.run(candidate, program, input).await?;
        }

        let mut samples = Vec::with_capacity(self.settings.runs);
        for i in 0..self.settings.runs {
            debug!(awk = %candidate.name, program = %program.id(), iteration = i, "measure");
            samples.push(self.run(candidate, program, input).await?);
        }

        Ok(aggregate(&candidate.name, &program.id(), &samples, input_size))
    }

    async fn run(
        &self,
        candidate: &Candidate,
        program: &Program,
        input: &Path,
    ) -> Result<Duration> {
        let outcome = self
            .executor
            .run_once(candidate, program, input, self.settings.timeout)
            .await;
        let awk = outcome.candidate.clone();
        let program_id = outcome.program.clone();
        outcome
            .into_elapsed()
            .map_err(|source| AwkBenchError::Execution {
                candidate: awk,
                program: program_id,
                source,
            })
    }
}
