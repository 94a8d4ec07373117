use proptest::prelude::*;
use sa_trace::sort::{bucket_count_for, bucket_sort, comparison_sort};
use sa_trace::verify::naive_order;
use sa_trace::{pairs, Config, Phase, RankArray, RankPolicy, SortStrategy, StepDetail, Trace, Tracer};

fn configs() -> impl Strategy<Value = Config> {
    (
        prop::sample::select(vec![RankPolicy::Dense, RankPolicy::CodePoint]),
        prop::sample::select(vec![SortStrategy::Comparison, SortStrategy::Bucket]),
    )
        .prop_map(|(policy, strategy)| {
            Config::default()
                .with_rank_policy(policy)
                .with_sort_strategy(strategy)
        })
}

/// Small alphabets produce long runs of ties, which is where doubling works hardest.
fn inputs() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ab]{1,48}",
        "[a-e]{1,32}",
        "\\PC{1,16}",
    ]
}

fn distinct_ranks(trace: &Trace) -> Vec<(Phase, usize)> {
    trace
        .iter()
        .filter(|s| matches!(s.phase(), Phase::Init | Phase::RankUpdate))
        .map(|s| (s.phase(), s.ranks().distinct_count()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        rng_seed: proptest::test_runner::RngSeed::Fixed(0),
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn matches_naive_suffix_sort(input in inputs(), config in configs()) {
        let trace = Tracer::new(config).trace(&input).unwrap();
        let expected = naive_order(&input);
        prop_assert_eq!(trace.suffix_array(), expected.as_slice());
    }

    #[test]
    fn identical_input_gives_identical_trace(input in inputs(), config in configs()) {
        let tracer = Tracer::new(config);
        prop_assert_eq!(tracer.trace(&input).unwrap(), tracer.trace(&input).unwrap());
    }

    #[test]
    fn distinct_rank_count_never_drops(input in inputs(), config in configs()) {
        let trace = Tracer::new(config).trace(&input).unwrap();
        let n = input.chars().count();
        let counts = distinct_ranks(&trace);

        for window in counts.windows(2) {
            prop_assert!(window[0].1 <= window[1].1, "counts went down: {:?}", counts);
        }
        if n > 1 {
            let updates: Vec<usize> = counts
                .iter()
                .filter(|(phase, _)| *phase == Phase::RankUpdate)
                .map(|(_, count)| *count)
                .collect();
            // the loop stops at the first update where every rank is distinct
            prop_assert_eq!(updates.last().copied(), Some(n));
            prop_assert!(updates[..updates.len() - 1].iter().all(|&c| c < n));
            prop_assert!(updates.len() <= sa_trace::tracer::max_iterations(n));
        }
    }

    #[test]
    fn ranks_tie_exactly_when_prefixes_match(input in inputs(), config in configs()) {
        let chars: Vec<char> = input.chars().collect();
        let n = chars.len();
        let trace = Tracer::new(config).trace(&input).unwrap();

        for step in trace.iter().filter(|s| s.phase() == Phase::PairGeneration) {
            let k = step.k();
            let ranks = step.ranks();
            for i in 0..n {
                for j in 0..n {
                    let a = &chars[i..(i + k).min(n)];
                    let b = &chars[j..(j + k).min(n)];
                    prop_assert_eq!(ranks.get(i) == ranks.get(j), a == b, "k={} i={} j={}", k, i, j);
                }
            }
        }
    }

    #[test]
    fn sorters_agree(
        ranks in (1usize..40).prop_flat_map(|n| prop::collection::vec(0..n as i64, n)),
        k in 1usize..8,
    ) {
        let ranks = RankArray::from_suffix_ranks(ranks).unwrap();
        let (pairs, _) = pairs::generate(&ranks, k).unwrap();
        let [_, (bucketed, _)] = bucket_sort(&pairs, bucket_count_for(&ranks)).unwrap();
        prop_assert_eq!(comparison_sort(&pairs), bucketed);
    }

    #[test]
    fn step_count_follows_the_strategy(input in "[a-d]{2,32}", config in configs()) {
        let trace = Tracer::new(config).trace(&input).unwrap();
        let iterations = match trace.steps().last().map(|s| s.detail()) {
            Some(StepDetail::Final(summary)) => summary.iterations,
            other => panic!("unexpected final detail {other:?}"),
        };
        let per_iteration = match config.sort_strategy {
            SortStrategy::Comparison => 3,
            SortStrategy::Bucket => 4,
        };
        prop_assert_eq!(trace.len(), 2 + iterations * per_iteration);
    }
}
