//! Benchmark engine module
//!
//! Candidate resolution, single-run execution, the warmup/measurement
//! protocol, aggregation, ranking and the session driver.

pub mod catalog;
pub mod executor;
pub mod orchestrator;
pub mod ranking;
pub mod registry;
pub mod session;
pub mod stats;

// Re-export commonly used types
pub use catalog::{dataset_for, ProgramCatalog};
pub use executor::{Executor, ProcessExecutor, Program};
pub use orchestrator::{BenchmarkRunner, RunnerSettings};
pub use ranking::rank;
pub use registry::{Registry, Resolver};
pub use session::{Session, SessionReport};
pub use stats::aggregate;
