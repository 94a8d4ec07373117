use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pairs::{IndexedPair, KeyPair};
use crate::rank::{Rank, RankArray};
use crate::trace::{Phase, Step, StepDetail};

/// How the key pairs of one iteration get ordered. Both strategies are
/// stable and produce the same order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum SortStrategy {
    /// One stable sort with the two-key comparator.
    #[default]
    Comparison,
    /// Two stable bucket passes, secondary key first.
    Bucket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    Primary,
    Secondary,
}

impl SortKey {
    fn of(self, pair: &KeyPair) -> Rank {
        match self {
            SortKey::Primary => pair.primary,
            SortKey::Secondary => pair.secondary,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Primary => f.write_str("primary"),
            SortKey::Secondary => f.write_str("secondary"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BucketOccupancy {
    /// Rank value the bucket holds; the sentinel bucket reports `-1`.
    pub rank: Rank,
    pub count: usize,
}

/// What one sorting pass did, kept for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortPass {
    Comparison,
    Bucket {
        key: SortKey,
        bucket_count: usize,
        /// Non-empty buckets only, in bucket order.
        occupied: Vec<BucketOccupancy>,
    },
}

impl fmt::Display for SortPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortPass::Comparison => f.write_str("comparison sort on (primary, secondary)"),
            SortPass::Bucket { key, bucket_count, occupied } => {
                write!(f, "bucket pass on {key}, {} of {bucket_count} buckets used:", occupied.len())?;
                for bucket in occupied {
                    write!(f, " {}x{}", bucket.rank, bucket.count)?;
                }
                Ok(())
            }
        }
    }
}

/// Stable sort of the pairs with the derived `(primary, secondary)` order.
pub fn comparison_sort(pairs: &[IndexedPair]) -> Vec<IndexedPair> {
    let mut sorted = pairs.to_vec();
    sorted.sort_by(|a, b| a.pair.cmp(&b.pair));
    sorted
}

/// Buckets needed to hold every rank in `ranks` plus the sentinel.
///
/// Refined ranks are dense in `[0, n)`, which gives exactly `n + 1`; raw code
/// point ranks may need more on the first iteration.
pub fn bucket_count_for(ranks: &RankArray) -> usize {
    let widest = ranks
        .max_rank()
        .map(|max| max as usize + 1)
        .unwrap_or(0);
    ranks.len().max(widest) + 1
}

fn bucket_of(rank: Rank, bucket_count: usize) -> Result<usize> {
    let bucket = rank + 1;
    if bucket < 0 || bucket as usize >= bucket_count {
        return Err(Error::invariant(format!(
            "rank {rank} does not fit in {bucket_count} buckets"
        )));
    }
    Ok(bucket as usize)
}

/// One stable counting-sort pass over a single key.
fn redistribute(
    items: &[IndexedPair],
    key: SortKey,
    bucket_count: usize,
) -> Result<(Vec<IndexedPair>, SortPass)> {
    let mut counts = vec![0usize; bucket_count];
    for item in items {
        counts[bucket_of(key.of(&item.pair), bucket_count)?] += 1;
    }

    let mut offsets = vec![0usize; bucket_count];
    for b in 1..bucket_count {
        offsets[b] = offsets[b - 1] + counts[b - 1];
    }

    let mut sorted = items.to_vec();
    for item in items {
        let b = bucket_of(key.of(&item.pair), bucket_count)?;
        sorted[offsets[b]] = *item;
        offsets[b] += 1;
    }

    let occupied = counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(b, &count)| BucketOccupancy {
            rank: b as Rank - 1,
            count,
        })
        .collect::<Vec<_>>();
    log::trace!("{key} pass: {} of {bucket_count} buckets occupied", occupied.len());

    Ok((sorted, SortPass::Bucket { key, bucket_count, occupied }))
}

/// Least-significant-key-first radix sort: a pass on `secondary`, then a
/// pass on `primary` over its result. The second pass holds the final order.
pub fn bucket_sort(
    pairs: &[IndexedPair],
    bucket_count: usize,
) -> Result<[(Vec<IndexedPair>, SortPass); 2]> {
    let (by_secondary, secondary_pass) = redistribute(pairs, SortKey::Secondary, bucket_count)?;
    let (by_primary, primary_pass) = redistribute(&by_secondary, SortKey::Primary, bucket_count)?;
    Ok([(by_secondary, secondary_pass), (by_primary, primary_pass)])
}

impl SortStrategy {
    /// Orders the pairs of iteration `k` and returns the `Sort` steps it took.
    pub fn run(self, pairs: &[IndexedPair], ranks: &RankArray, k: usize) -> Result<(Vec<IndexedPair>, Vec<Step>)> {
        if pairs.len() != ranks.len() {
            return Err(Error::invariant(format!(
                "{} pairs for {} ranks",
                pairs.len(),
                ranks.len()
            )));
        }

        match self {
            SortStrategy::Comparison => {
                let sorted = comparison_sort(pairs);
                let step = Step::new(Phase::Sort, k, ranks.clone())
                    .with_pairs(pairs.to_vec())
                    .with_sorted_pairs(sorted.clone())
                    .describe("Sort the suffixes by (rank, rank k later)")
                    .with_detail(StepDetail::SortPass(SortPass::Comparison));
                Ok((sorted, vec![step]))
            }
            SortStrategy::Bucket => {
                let bucket_count = bucket_count_for(ranks);
                let [(by_secondary, secondary_pass), (by_primary, primary_pass)] =
                    bucket_sort(pairs, bucket_count)?;
                let steps = vec![
                    Step::new(Phase::Sort, k, ranks.clone())
                        .with_pairs(pairs.to_vec())
                        .with_sorted_pairs(by_secondary.clone())
                        .describe("Distribute the suffixes into buckets by their second key")
                        .with_detail(StepDetail::SortPass(secondary_pass)),
                    Step::new(Phase::Sort, k, ranks.clone())
                        .with_pairs(by_secondary)
                        .with_sorted_pairs(by_primary.clone())
                        .describe("Redistribute by the first key, keeping the previous order within each bucket")
                        .with_detail(StepDetail::SortPass(primary_pass)),
                ];
                Ok((by_primary, steps))
            }
        }
    }
}
