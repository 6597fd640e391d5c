//! Cross-program ranking
//!
//! Scores each candidate by the geometric mean of its per-program means,
//! normalized so the fastest candidate scores exactly 1.0.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::models::{AggregatedResult, RankingEntry};

/// Rank candidates fastest first. Ties are broken by candidate name.
pub fn rank(results: &[AggregatedResult]) -> Vec<RankingEntry> {
    let mut by_awk: BTreeMap<&str, Vec<Duration>> = BTreeMap::new();
    for result in results {
        by_awk.entry(result.awk.as_str()).or_default().push(result.mean);
    }

    // Sorted so the floating-point sum does not depend on input order
    let geo_means: Vec<(&str, f64, usize)> = by_awk
        .into_iter()
        .map(|(awk, mut means)| {
            means.sort_unstable();
            (awk, geometric_mean_nanos(&means), means.len())
        })
        .collect();

    let Some(fastest) = geo_means.iter().map(|(_, g, _)| *g).reduce(f64::min) else {
        return Vec::new();
    };

    let mut entries: Vec<RankingEntry> = geo_means
        .into_iter()
        .map(|(awk, geo, programs)| RankingEntry {
            awk: awk.to_string(),
            score: geo / fastest,
            geometric_mean: Duration::from_nanos(geo.round() as u64),
            programs,
        })
        .collect();

    entries.sort_by(|a, b| a.score.total_cmp(&b.score).then_with(|| a.awk.cmp(&b.awk)));
    entries
}

/// Geometric mean in nanoseconds, computed in log space so long sessions
/// cannot overflow. Means below 1ns are treated as 1ns.
fn geometric_mean_nanos(means: &[Duration]) -> f64 {
    let log_sum: f64 = means
        .iter()
        .map(|d| (d.as_nanos().max(1) as f64).ln())
        .sum();
    (log_sum / means.len() as f64).exp()
}
