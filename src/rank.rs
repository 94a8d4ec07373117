use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::trace::{Phase, Step, StepDetail, SuffixRow};

pub type Rank = i64;

/// Rank of the position just past the end of the string. Compares below every
/// real rank, so a shorter suffix sorts before a longer one sharing its prefix.
pub const SENTINEL: Rank = -1;

/// How single characters are turned into the first generation of ranks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum RankPolicy {
    /// The j-th distinct character in code point order gets rank j.
    #[default]
    Dense,
    /// The character's Unicode scalar value is used as its rank.
    CodePoint,
}

/// Tie classes for every suffix start plus the trailing sentinel slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankArray {
    ranks: Vec<Rank>,
}

impl RankArray {
    /// Wraps the ranks of positions `0..n` and appends the sentinel.
    pub fn from_suffix_ranks(mut ranks: Vec<Rank>) -> Result<RankArray> {
        if let Some(bad) = ranks.iter().find(|&&r| r < 0) {
            return Err(Error::invariant(format!("negative rank {bad} before the sentinel")));
        }
        ranks.push(SENTINEL);
        Ok(RankArray { ranks })
    }

    /// Number of suffixes, i.e. the length of the input.
    pub fn len(&self) -> usize {
        self.ranks.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rank of the suffix starting at `i`, or [`SENTINEL`] past the end.
    pub fn get(&self, i: usize) -> Rank {
        if i < self.len() {
            self.ranks[i]
        } else {
            SENTINEL
        }
    }

    /// All `n + 1` entries, sentinel included.
    pub fn as_slice(&self) -> &[Rank] {
        &self.ranks
    }

    /// The `n` real ranks without the sentinel.
    pub fn suffix_ranks(&self) -> &[Rank] {
        &self.ranks[..self.len()]
    }

    pub fn max_rank(&self) -> Option<Rank> {
        self.suffix_ranks().iter().copied().max()
    }

    pub fn distinct_count(&self) -> usize {
        let mut seen = self.suffix_ranks().to_vec();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }

    /// Checks the structural invariants a snapshot must satisfy: a single
    /// trailing sentinel and no negative rank before it.
    pub fn validate(&self) -> Result<()> {
        match self.ranks.last() {
            Some(&SENTINEL) => {}
            _ => return Err(Error::invariant("rank array does not end with the sentinel")),
        }
        if self.suffix_ranks().iter().any(|&r| r < 0) {
            return Err(Error::invariant("rank array holds a negative rank before the sentinel"));
        }
        Ok(())
    }
}

fn dense_ranks(text: &[char]) -> Vec<Rank> {
    let mut alphabet = text.to_vec();
    alphabet.sort_unstable();
    alphabet.dedup();
    text.iter()
        .map(|c| alphabet.partition_point(|a| a < c) as Rank)
        .collect()
}

fn code_point_ranks(text: &[char]) -> Vec<Rank> {
    text.iter().map(|&c| u32::from(c) as Rank).collect()
}

/// Lists every suffix with its current rank, in index order.
pub(crate) fn suffix_rows(text: &[char], ranks: &RankArray) -> Vec<SuffixRow> {
    (0..text.len())
        .map(|i| SuffixRow {
            index: i,
            suffix: text[i..].iter().collect(),
            rank: ranks.get(i),
        })
        .collect()
}

/// Assigns the first generation of ranks from single characters.
pub fn initialize(text: &[char], policy: RankPolicy) -> Result<(RankArray, Step)> {
    if text.is_empty() {
        return Err(Error::invalid_input("cannot build a suffix array for an empty string"));
    }
    if Rank::try_from(text.len()).is_err() {
        return Err(Error::invalid_input(format!(
            "input of {} characters is too long to rank",
            text.len()
        )));
    }

    let ranks = RankArray::from_suffix_ranks(match policy {
        RankPolicy::Dense => dense_ranks(text),
        RankPolicy::CodePoint => code_point_ranks(text),
    })?;

    let rows = suffix_rows(text, &ranks);

    let description = match policy {
        RankPolicy::Dense => format!(
            "Rank every suffix by its first character ({} distinct characters)",
            ranks.distinct_count()
        ),
        RankPolicy::CodePoint => "Rank every suffix by the code point of its first character".to_string(),
    };
    log::debug!("initial ranks: {} distinct over {} suffixes", ranks.distinct_count(), ranks.len());

    let step = Step::new(Phase::Init, 0, ranks.clone())
        .describe(description)
        .with_detail(StepDetail::Suffixes(rows));
    Ok((ranks, step))
}
