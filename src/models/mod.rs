//! Data models module
//! 
//! Contains the candidate description, per-run outcomes, aggregated
//! benchmark results and ranking entries.

pub mod candidate;
pub mod result;

// Re-export commonly used types
pub use candidate::Candidate;
pub use result::{
    AggregatedResult,
    BenchFailure,
    RankingEntry,
    RunOutcome,
    SystemInfo,
};
