use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rank::{Rank, RankArray};
use crate::trace::{Phase, Step};

/// Two-key comparison pair for a suffix at doubling distance `k`.
///
/// The derived ordering compares `primary` first and falls back to
/// `secondary`, so a sentinel secondary sorts before any real rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KeyPair {
    pub primary: Rank,
    pub secondary: Rank,
}

impl KeyPair {
    /// `(rank[i], rank[i + k])`, with the sentinel once `i + k` runs off the end.
    pub fn at(ranks: &RankArray, i: usize, k: usize) -> KeyPair {
        KeyPair {
            primary: ranks.get(i),
            secondary: ranks.get(i + k),
        }
    }
}

impl fmt::Display for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.primary, self.secondary)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexedPair {
    pub index: usize,
    pub pair: KeyPair,
}

impl fmt::Display for IndexedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.index, self.pair)
    }
}

/// Builds the key pair of every suffix, ordered by suffix index.
pub fn generate(ranks: &RankArray, k: usize) -> Result<(Vec<IndexedPair>, Step)> {
    if k == 0 {
        return Err(Error::invariant("pair generation needs a doubling distance of at least 1"));
    }
    ranks.validate()?;

    let pairs: Vec<IndexedPair> = (0..ranks.len())
        .map(|index| IndexedPair {
            index,
            pair: KeyPair::at(ranks, index, k),
        })
        .collect();
    log::debug!("k={k}: generated {} pairs", pairs.len());

    let step = Step::new(Phase::PairGeneration, k, ranks.clone())
        .with_pairs(pairs.clone())
        .describe(format!(
            "Pair each suffix's rank with the rank {k} position{} later",
            if k == 1 { "" } else { "s" }
        ));
    Ok((pairs, step))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::SENTINEL;
    use pretty_assertions::assert_eq;

    fn pair(primary: Rank, secondary: Rank) -> KeyPair {
        KeyPair { primary, secondary }
    }

    #[test]
    fn aaa_pairs_at_distance_one() {
        let ranks = RankArray::from_suffix_ranks(vec![0, 0, 0]).unwrap();
        let (pairs, step) = generate(&ranks, 1).unwrap();
        let keys: Vec<KeyPair> = pairs.iter().map(|p| p.pair).collect();
        assert_eq!(keys, vec![pair(0, 0), pair(0, 0), pair(0, SENTINEL)]);
        assert_eq!(step.phase(), Phase::PairGeneration);
        assert_eq!(step.k(), 1);
        assert_eq!(step.ranks(), &ranks);
        assert_eq!(step.pairs(), Some(pairs.as_slice()));
        assert_eq!(step.sorted_pairs(), None);
    }

    #[test]
    fn secondary_runs_off_the_end() {
        let ranks = RankArray::from_suffix_ranks(vec![1, 1, 0, 2, 0]).unwrap();
        let (pairs, _) = generate(&ranks, 4).unwrap();
        assert_eq!(pairs[0].pair, pair(1, 0));
        assert!(pairs[1..].iter().all(|p| p.pair.secondary == SENTINEL));
    }

    #[test]
    fn sentinel_secondary_sorts_first() {
        assert!(pair(0, SENTINEL) < pair(0, 0));
        assert!(pair(0, 5) < pair(1, SENTINEL));
    }

    #[test]
    fn zero_distance_is_rejected() {
        let ranks = RankArray::from_suffix_ranks(vec![0, 1]).unwrap();
        assert!(generate(&ranks, 0).is_err());
    }

    #[test]
    fn display_matches_table_notation() {
        let p = IndexedPair { index: 2, pair: pair(0, SENTINEL) };
        assert_eq!(p.to_string(), "2:(0, -1)");
    }
}
