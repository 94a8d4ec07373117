use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::trace::Trace;

/// The finished permutation together with the text it sorts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixArray {
    text: Vec<char>,
    array: Vec<usize>,
}

impl SuffixArray {
    pub fn from_trace(trace: &Trace) -> Result<SuffixArray> {
        let text: Vec<char> = trace.input().chars().collect();
        let array = trace
            .final_summary()
            .ok_or_else(|| Error::invariant("trace has no final step"))?
            .suffix_array
            .clone();
        if array.len() != text.len() {
            return Err(Error::invariant(format!(
                "final suffix array has {} entries for {} characters",
                array.len(),
                text.len()
            )));
        }
        Ok(SuffixArray { text, array })
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.array
    }

    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// The suffix at position `rank` in sorted order.
    pub fn suffix(&self, rank: usize) -> Option<String> {
        self.array.get(rank).map(|&start| self.text[start..].iter().collect())
    }

    fn prefix_at(&self, rank: usize, len: usize) -> &[char] {
        let start = self.array[rank];
        let end = (start + len).min(self.text.len());
        &self.text[start..end]
    }

    /// Smallest sorted position at which `f` stops holding.
    fn binary_search<F>(&self, pattern: &[char], f: F) -> usize
    where
        F: Fn(&[char], &[char]) -> bool,
    {
        let (mut ng, mut ok) = (-1isize, self.array.len() as isize);
        while ok - ng > 1 {
            let pos = (ng + ok) / 2;
            if f(self.prefix_at(pos as usize, pattern.len()), pattern) {
                ng = pos;
            } else {
                ok = pos;
            }
        }
        ok as usize
    }

    pub fn lower_bound(&self, pattern: &str) -> usize {
        let pattern: Vec<char> = pattern.chars().collect();
        self.binary_search(&pattern, |sub, p| sub.cmp(p) == Ordering::Less)
    }

    pub fn upper_bound(&self, pattern: &str) -> usize {
        let pattern: Vec<char> = pattern.chars().collect();
        self.binary_search(&pattern, |sub, p| sub.cmp(p) != Ordering::Greater)
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.lower_bound(pattern) < self.upper_bound(pattern)
    }

    /// Start positions of every occurrence of `pattern`, in ascending order.
    pub fn occurrences(&self, pattern: &str) -> Vec<usize> {
        let mut found = self.array[self.lower_bound(pattern)..self.upper_bound(pattern)].to_vec();
        found.sort_unstable();
        found
    }
}
