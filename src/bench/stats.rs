//! Sample aggregation
//!
//! Reduces measured elapsed times to min/max/mean/median/stddev and
//! derives throughput from the input size.

use std::time::Duration;

use crate::models::AggregatedResult;
use crate::util::units::calculate_throughput_mbps;

/// Summarize `samples` for one candidate on one program.
///
/// Statistics do not depend on sample order. Throughput is zero when the
/// mean or `input_size` is zero.
///
/// # Panics
///
/// Panics if `samples` is empty; the orchestrator always measures at
/// least once.
pub fn aggregate(
    awk: &str,
    program: &str,
    samples: &[Duration],
    input_size: u64,
) -> AggregatedResult {
    assert!(!samples.is_empty(), "aggregate requires at least one sample");

    let n = samples.len();
    let mut sorted = samples.to_vec();
    sorted.sort_unstable();

    let min = sorted[0];
    let max = sorted[n - 1];

    let sum: u128 = sorted.iter().map(Duration::as_nanos).sum();
    let mean = nanos_to_duration(sum / n as u128);

    let median = if n % 2 == 0 {
        let lower = sorted[n / 2 - 1].as_nanos();
        let upper = sorted[n / 2].as_nanos();
        nanos_to_duration((lower + upper) / 2)
    } else {
        sorted[n / 2]
    };

    // Summed in sorted order so the float result is the same for any
    // permutation of the samples
    let mean_nanos = sum as f64 / n as f64;
    let variance = sorted
        .iter()
        .map(|d| {
            let diff = d.as_nanos() as f64 - mean_nanos;
            diff * diff
        })
        .sum::<f64>()
        / n as f64;
    let std_dev = Duration::from_nanos(variance.sqrt() as u64);

    AggregatedResult {
        awk: awk.to_string(),
        program: program.to_string(),
        runs: n,
        min,
        max,
        mean,
        median,
        std_dev,
        throughput_mbps: calculate_throughput_mbps(input_size, mean),
    }
}

fn nanos_to_duration(nanos: u128) -> Duration {
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}
