//! Prefix-doubling driver.
//!
//! Runs `init -> (pair generation -> sort -> rank update)* -> final`, feeding
//! each phase the value the previous one returned and recording its step.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::pairs::{self, IndexedPair};
use crate::rank::{self, RankArray};
use crate::refine::{self, Termination};
use crate::trace::{FinalSummary, Phase, Step, StepDetail, Trace, TraceRecorder};

enum State {
    PairGen { k: usize, ranks: RankArray },
    Sort { k: usize, ranks: RankArray, pairs: Vec<IndexedPair> },
    RankUpdate { k: usize, ranks: RankArray, sorted: Vec<IndexedPair> },
    Terminated { k: usize, ranks: RankArray },
}

/// Upper bound on doubling iterations for `n` suffixes: `ceil(log2 n) + 1`.
pub fn max_iterations(n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    (usize::BITS - (n - 1).leading_zeros()) as usize + 1
}

/// Suffix start positions ordered by final rank.
pub(crate) fn order_by_rank(ranks: &RankArray) -> Vec<usize> {
    let mut order: Vec<usize> = (0..ranks.len()).collect();
    order.sort_by_key(|&i| ranks.get(i));
    order
}

fn final_step(k: usize, ranks: RankArray, iterations: usize, input: &str) -> Step {
    let suffix_array = order_by_rank(&ranks);
    let description = format!(
        "Suffix array of {input:?} is {suffix_array:?} after {iterations} iteration{}",
        if iterations == 1 { "" } else { "s" }
    );
    Step::new(Phase::Final, k, ranks)
        .describe(description)
        .with_detail(StepDetail::Final(FinalSummary { suffix_array, iterations }))
}

/// Builds suffix arrays and records how it got there.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tracer {
    config: Config,
}

impl Tracer {
    pub fn new(config: Config) -> Tracer {
        Tracer { config }
    }

    pub fn config(&self) -> Config {
        self.config
    }

    /// Traces the construction of the suffix array of `input`.
    ///
    /// Fails with [`Error::InvalidInput`] for an empty string; nothing is
    /// recorded in that case.
    pub fn trace(&self, input: &str) -> Result<Trace> {
        let text: Vec<char> = input.chars().collect();
        let n = text.len();
        let (ranks, init) = rank::initialize(&text, self.config.rank_policy)?;

        let mut recorder = TraceRecorder::new(input, self.config);
        if n == 1 {
            recorder.record(final_step(0, ranks, 0, input));
            return recorder.finish();
        }
        recorder.record(init);

        let limit = max_iterations(n);
        let mut iterations = 0;
        let mut state = State::PairGen { k: 1, ranks };
        loop {
            state = match state {
                State::PairGen { k, ranks } => {
                    let (pairs, step) = pairs::generate(&ranks, k)?;
                    let rows = rank::suffix_rows(&text, &ranks);
                    recorder.record(step.with_detail(StepDetail::Suffixes(rows)));
                    State::Sort { k, ranks, pairs }
                }
                State::Sort { k, ranks, pairs } => {
                    let (sorted, steps) = self.config.sort_strategy.run(&pairs, &ranks, k)?;
                    recorder.record_all(steps);
                    State::RankUpdate { k, ranks, sorted }
                }
                State::RankUpdate { k, ranks, sorted } => {
                    iterations += 1;
                    let (next, step) = refine::refine(&sorted, &ranks, k)?;
                    recorder.record(step);
                    match refine::check(&next) {
                        Termination::Done => {
                            let by_rank = order_by_rank(&next);
                            if sorted.iter().map(|p| p.index).ne(by_rank.iter().copied()) {
                                return Err(Error::invariant(
                                    "sorted pair order disagrees with the final ranks",
                                ));
                            }
                            State::Terminated { k, ranks: next }
                        }
                        Termination::Continue if 2 * k < n && iterations < limit => {
                            State::PairGen { k: 2 * k, ranks: next }
                        }
                        Termination::Continue => {
                            return Err(Error::invariant(format!(
                                "ranks still tie after {iterations} iterations at k={k} for n={n}"
                            )));
                        }
                    }
                }
                State::Terminated { k, ranks } => {
                    log::debug!("terminated after {iterations} iterations at k={k}");
                    recorder.record(final_step(k, ranks, iterations, input));
                    break;
                }
            };
        }
        recorder.finish()
    }
}

/// Traces `input` with the default configuration.
pub fn trace(input: &str) -> Result<Trace> {
    Tracer::default().trace(input)
}
