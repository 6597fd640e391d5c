//! Property tests for sample aggregation and ranking

use awkbench::bench::{aggregate, rank};
use awkbench::models::AggregatedResult;
use proptest::prelude::*;
use std::time::Duration;

const CANDIDATES: [&str; 4] = ["gawk", "goawk", "mawk", "onetrue-awk"];
const PROGRAMS: [&str; 6] = [
    "count.awk",
    "fields.awk",
    "groupby.awk",
    "regex.awk",
    "sum.awk",
    "wordfreq.awk",
];

fn durations(nanos: &[u64]) -> Vec<Duration> {
    nanos.iter().map(|&n| Duration::from_nanos(n)).collect()
}

/// Elapsed times up to 10s, paired with a permutation of themselves
fn samples_and_shuffle() -> impl Strategy<Value = (Vec<u64>, Vec<u64>)> {
    prop::collection::vec(0u64..10_000_000_000, 1..64)
        .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
}

fn result(awk: &str, program: &str, mean_nanos: u64) -> AggregatedResult {
    let mean = Duration::from_nanos(mean_nanos);
    AggregatedResult {
        awk: awk.to_string(),
        program: program.to_string(),
        runs: 3,
        min: mean,
        max: mean,
        mean,
        median: mean,
        std_dev: Duration::ZERO,
        throughput_mbps: 0.0,
    }
}

/// Candidate x program mean tables, paired with a reordering of the rows
fn table_and_shuffle() -> impl Strategy<Value = (Vec<AggregatedResult>, Vec<AggregatedResult>)> {
    prop::collection::vec((0..CANDIDATES.len(), 0..PROGRAMS.len(), 0u64..5_000_000_000), 1..40)
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(c, p, mean)| result(CANDIDATES[c], PROGRAMS[p], mean))
                .collect::<Vec<_>>()
        })
        .prop_flat_map(|table| (Just(table.clone()), Just(table).prop_shuffle()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_aggregate_bounds((nanos, _) in samples_and_shuffle(), size in 0u64..1 << 32) {
        let r = aggregate("mawk", "sum.awk", &durations(&nanos), size);

        prop_assert_eq!(r.runs, nanos.len());
        prop_assert!(r.min <= r.median && r.median <= r.max);
        prop_assert!(r.min <= r.mean && r.mean <= r.max);
        prop_assert!(r.std_dev <= r.max - r.min);
        prop_assert_eq!(r.min, Duration::from_nanos(*nanos.iter().min().unwrap()));
        prop_assert_eq!(r.max, Duration::from_nanos(*nanos.iter().max().unwrap()));
        prop_assert!(r.throughput_mbps >= 0.0 && r.throughput_mbps.is_finite());
    }

    #[test]
    fn prop_aggregate_ignores_sample_order((nanos, shuffled) in samples_and_shuffle()) {
        let a = aggregate("gawk", "regex.awk", &durations(&nanos), 10 << 20);
        let b = aggregate("gawk", "regex.awk", &durations(&shuffled), 10 << 20);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_constant_samples_have_no_spread(n in 0u64..10_000_000_000, len in 1usize..32) {
        let r = aggregate("goawk", "count.awk", &vec![Duration::from_nanos(n); len], 1024);
        let expected = Duration::from_nanos(n);

        prop_assert_eq!(r.min, expected);
        prop_assert_eq!(r.max, expected);
        prop_assert_eq!(r.mean, expected);
        prop_assert_eq!(r.median, expected);
        prop_assert_eq!(r.std_dev, Duration::ZERO);
    }

    #[test]
    fn prop_zero_input_size_has_zero_throughput((nanos, _) in samples_and_shuffle()) {
        let r = aggregate("mawk", "fields.awk", &durations(&nanos), 0);
        prop_assert_eq!(r.throughput_mbps, 0.0);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_rank_ignores_row_order((table, shuffled) in table_and_shuffle()) {
        prop_assert_eq!(rank(&table), rank(&shuffled));
    }

    #[test]
    fn prop_rank_normalizes_to_fastest((table, _) in table_and_shuffle()) {
        let ranking = rank(&table);

        let mut names: Vec<&str> = table.iter().map(|r| r.awk.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        prop_assert_eq!(ranking.len(), names.len());

        prop_assert_eq!(ranking[0].score, 1.0);
        prop_assert!(ranking.iter().all(|e| e.score >= 1.0));
        prop_assert!(ranking.windows(2).all(|w| w[0].score <= w[1].score));
        prop_assert_eq!(ranking.iter().map(|e| e.programs).sum::<usize>(), table.len());
    }

    #[test]
    fn prop_single_candidate_scores_one(
        means in prop::collection::vec(0u64..5_000_000_000, 1..PROGRAMS.len() + 1)
    ) {
        let table: Vec<AggregatedResult> = means
            .iter()
            .enumerate()
            .map(|(i, &mean)| result("mawk", PROGRAMS[i], mean))
            .collect();
        let ranking = rank(&table);

        prop_assert_eq!(ranking.len(), 1);
        prop_assert_eq!(ranking[0].score, 1.0);
        prop_assert_eq!(ranking[0].programs, means.len());
    }
}
