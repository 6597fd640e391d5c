//! Benchmark session driver
//!
//! Walks every program against every available candidate, one benchmark
//! at a time, and collects successes and isolated failures into a
//! [`SessionReport`].

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use crate::bench::catalog::ProgramCatalog;
use crate::bench::executor::Executor;
use crate::bench::orchestrator::BenchmarkRunner;
use crate::bench::ranking::rank;
use crate::dataset::Datasets;
use crate::models::{AggregatedResult, BenchFailure, Candidate, RankingEntry, SystemInfo};
use crate::{AwkBenchError, Result};

/// Everything a session produced
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub generated: DateTime<Utc>,
    pub system: SystemInfo,
    pub results: Vec<AggregatedResult>,
    pub ranking: Vec<RankingEntry>,
    pub failures: Vec<BenchFailure>,
}

impl SessionReport {
    /// Build a report, ranking `results`
    pub fn new(results: Vec<AggregatedResult>, failures: Vec<BenchFailure>) -> Self {
        let ranking = rank(&results);
        Self {
            generated: Utc::now(),
            system: SystemInfo::detect(),
            results,
            ranking,
            failures,
        }
    }
}

/// Runs a full candidates x programs session
pub struct Session<E> {
    runner: BenchmarkRunner<E>,
    show_progress: bool,
}

impl<E: Executor> Session<E> {
    pub fn new(runner: BenchmarkRunner<E>) -> Self {
        Self {
            runner,
            show_progress: false,
        }
    }

    /// Draw a progress bar on stderr while running
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Benchmark each program (catalog order) with each candidate
    /// (declared order). Execution failures are recorded and skipped;
    /// anything else ends the session.
    pub async fn run(
        &self,
        candidates: &[Candidate],
        catalog: &ProgramCatalog,
        datasets: &Datasets,
    ) -> Result<SessionReport> {
        if candidates.is_empty() {
            return Err(AwkBenchError::NoCandidates);
        }

        let total = (catalog.len() * candidates.len()) as u64;
        let progress = self.progress_bar(total);
        info!(
            programs = catalog.len(),
            candidates = candidates.len(),
            runs = self.runner.settings().runs,
            warmup = self.runner.settings().warmup,
            "starting session"
        );

        let mut results = Vec::new();
        let mut failures = Vec::new();

        for (program, kind) in catalog.entries() {
            let program_id = program.id();
            let input = datasets.path(kind).ok_or_else(|| {
                AwkBenchError::Dataset(format!("No {} dataset for {}", kind, program_id))
            })?;
            let input_size = datasets.input_size(kind)?;
            info!(program = %program_id, dataset = %kind, "benchmarking");

            for candidate in candidates {
                progress.set_message(format!("{} / {}", program_id, candidate.name));
                match self
                    .runner
                    .benchmark(candidate, &program, input, input_size)
                    .await
                {
                    Ok(result) => results.push(result),
                    Err(err) if err.is_isolated() => {
                        warn!(awk = %candidate.name, program = %program_id, "{}", err);
                        let reason = match &err {
                            AwkBenchError::Execution { source, .. } => source.to_string(),
                            other => other.to_string(),
                        };
                        failures.push(BenchFailure {
                            awk: candidate.name.clone(),
                            program: program_id.clone(),
                            reason,
                        });
                    }
                    Err(err) => {
                        progress.abandon();
                        return Err(err);
                    }
                }
                progress.inc(1);
            }
        }

        progress.finish_and_clear();
        info!(
            results = results.len(),
            failures = failures.len(),
            "session complete"
        );
        Ok(SessionReport::new(results, failures))
    }

    fn progress_bar(&self, total: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total);
        let template = "{spinner} [{bar:30}] {pos}/{len} ({elapsed}) {msg}";
        if let Ok(style) = ProgressStyle::with_template(template) {
            pb.set_style(style);
        }
        pb
    }
}
