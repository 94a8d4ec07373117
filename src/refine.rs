use crate::error::{ensure_len, Error, Result};
use crate::pairs::IndexedPair;
use crate::rank::{Rank, RankArray, SENTINEL};
use crate::trace::{Phase, Step, StepDetail};

/// Outcome of checking the ranks after a refinement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Every suffix has its own rank; the sorted order is final.
    Done,
    /// Some suffixes still tie; double `k` and go again.
    Continue,
}

/// Turns a sorted pair sequence into dense ranks by counting tie classes.
///
/// The first suffix gets rank 0, and the counter moves up by one each time
/// a pair differs from its predecessor.
pub fn refine(sorted: &[IndexedPair], previous: &RankArray, k: usize) -> Result<(RankArray, Step)> {
    let n = previous.len();
    ensure_len("sorted pair sequence", sorted.len(), n)?;

    let mut new_rank: Vec<Rank> = vec![SENTINEL; n];
    let mut class: Rank = 0;
    for (i, current) in sorted.iter().enumerate() {
        let slot = new_rank.get_mut(current.index).ok_or_else(|| {
            Error::invariant(format!("sorted pair points at suffix {} of {n}", current.index))
        })?;
        if *slot != SENTINEL {
            return Err(Error::invariant(format!("suffix {} appears twice in the sorted pairs", current.index)));
        }
        if i > 0 {
            let before = &sorted[i - 1];
            if current.pair < before.pair {
                return Err(Error::invariant(format!(
                    "pairs are out of order at position {i}: {} after {}",
                    current.pair, before.pair
                )));
            }
            if current.pair != before.pair {
                class += 1;
            }
        }
        *slot = class;
    }

    let ranks = RankArray::from_suffix_ranks(new_rank)?;
    let distinct_before = previous.distinct_count();
    let distinct_after = ranks.distinct_count();
    log::debug!("k={k}: distinct ranks {distinct_before} -> {distinct_after} of {n}");

    let step = Step::new(Phase::RankUpdate, k, ranks.clone())
        .with_sorted_pairs(sorted.to_vec())
        .describe(format!(
            "Assign new ranks: suffixes with equal pairs share a rank ({distinct_after} distinct)"
        ))
        .with_detail(StepDetail::Refinement { distinct_before, distinct_after });
    Ok((ranks, step))
}

/// All ranks are distinct once the largest one reaches `n - 1`.
pub fn check(ranks: &RankArray) -> Termination {
    match ranks.max_rank() {
        Some(max) if max as usize + 1 == ranks.len() => Termination::Done,
        _ => Termination::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairs::generate;
    use crate::sort::comparison_sort;
    use pretty_assertions::assert_eq;

    fn round(ranks: &[Rank], k: usize) -> (RankArray, Step) {
        let ranks = RankArray::from_suffix_ranks(ranks.to_vec()).unwrap();
        let (pairs, _) = generate(&ranks, k).unwrap();
        refine(&comparison_sort(&pairs), &ranks, k).unwrap()
    }

    #[test]
    fn aaa_first_round() {
        let (ranks, step) = round(&[0, 0, 0], 1);
        assert_eq!(ranks.suffix_ranks(), &[1, 1, 0]);
        assert_eq!(check(&ranks), Termination::Continue);
        assert_eq!(step.phase(), Phase::RankUpdate);
        assert_eq!(
            step.detail(),
            &StepDetail::Refinement { distinct_before: 1, distinct_after: 2 }
        );
    }

    #[test]
    fn aaa_second_round_is_final() {
        let (ranks, _) = round(&[1, 1, 0], 2);
        assert_eq!(ranks.suffix_ranks(), &[2, 1, 0]);
        assert_eq!(check(&ranks), Termination::Done);
    }

    #[test]
    fn tie_classes_are_not_reused() {
        // "abab": pairs (0,1) (1,0) (0,1) (1,-1)
        let (ranks, _) = round(&[0, 1, 0, 1], 1);
        assert_eq!(ranks.suffix_ranks(), &[0, 2, 0, 1]);
    }

    #[test]
    fn length_mismatch_is_an_invariant_violation() {
        let previous = RankArray::from_suffix_ranks(vec![0, 0, 0]).unwrap();
        let (pairs, _) = generate(&previous, 1).unwrap();
        let err = refine(&pairs[..2], &previous, 1).unwrap_err();
        assert!(matches!(err, Error::InternalInvariantViolation { .. }));
    }

    #[test]
    fn unsorted_input_is_an_invariant_violation() {
        let previous = RankArray::from_suffix_ranks(vec![1, 0]).unwrap();
        let (pairs, _) = generate(&previous, 1).unwrap();
        assert!(refine(&pairs, &previous, 1).is_err());
    }

    #[test]
    fn repeated_index_is_an_invariant_violation() {
        let previous = RankArray::from_suffix_ranks(vec![0, 0]).unwrap();
        let (pairs, _) = generate(&previous, 1).unwrap();
        let doubled = vec![pairs[0], pairs[0]];
        assert!(refine(&doubled, &previous, 1).is_err());
    }
}
