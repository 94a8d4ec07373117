//! Immutable record of one suffix array construction.
//!
//! A [`Trace`] is an ordered list of [`Step`]s. Each step owns deep copies of
//! the arrays it shows, so nothing recorded here can change after the fact.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::pairs::IndexedPair;
use crate::rank::{Rank, RankArray};
use crate::sort::SortPass;
use crate::tracer::order_by_rank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Init,
    PairGeneration,
    Sort,
    RankUpdate,
    Final,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::PairGeneration => "pair generation",
            Phase::Sort => "sort",
            Phase::RankUpdate => "rank update",
            Phase::Final => "final",
        };
        f.write_str(name)
    }
}

/// One row of the suffix listing shown with the initial ranks and the pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuffixRow {
    pub index: usize,
    pub suffix: String,
    pub rank: Rank,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FinalSummary {
    pub suffix_array: Vec<usize>,
    /// Number of doubling iterations that ran.
    pub iterations: usize,
}

/// Phase-specific data that does not fit the common step fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepDetail {
    None,
    Suffixes(Vec<SuffixRow>),
    SortPass(SortPass),
    Refinement { distinct_before: usize, distinct_after: usize },
    Final(FinalSummary),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    phase: Phase,
    k: usize,
    ranks: RankArray,
    pairs: Option<Vec<IndexedPair>>,
    sorted_pairs: Option<Vec<IndexedPair>>,
    description: String,
    detail: StepDetail,
}

impl Step {
    pub(crate) fn new(phase: Phase, k: usize, ranks: RankArray) -> Step {
        Step {
            phase,
            k,
            ranks,
            pairs: None,
            sorted_pairs: None,
            description: String::new(),
            detail: StepDetail::None,
        }
    }

    pub(crate) fn with_pairs(mut self, pairs: Vec<IndexedPair>) -> Step {
        self.pairs = Some(pairs);
        self
    }

    pub(crate) fn with_sorted_pairs(mut self, sorted_pairs: Vec<IndexedPair>) -> Step {
        self.sorted_pairs = Some(sorted_pairs);
        self
    }

    pub(crate) fn describe(mut self, description: impl Into<String>) -> Step {
        self.description = description.into();
        self
    }

    pub(crate) fn with_detail(mut self, detail: StepDetail) -> Step {
        self.detail = detail;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Doubling distance the step belongs to; `0` for the initial ranks.
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn ranks(&self) -> &RankArray {
        &self.ranks
    }

    pub fn pairs(&self) -> Option<&[IndexedPair]> {
        self.pairs.as_deref()
    }

    pub fn sorted_pairs(&self) -> Option<&[IndexedPair]> {
        self.sorted_pairs.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn detail(&self) -> &StepDetail {
        &self.detail
    }
}

fn write_pairs(f: &mut fmt::Formatter<'_>, label: &str, pairs: &[IndexedPair]) -> fmt::Result {
    write!(f, "\n  {label}:")?;
    for pair in pairs {
        write!(f, " {pair}")?;
    }
    Ok(())
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} k={}] {}", self.phase, self.k, self.description)?;
        write!(f, "\n  ranks: {:?}", self.ranks.as_slice())?;
        if let Some(pairs) = &self.pairs {
            write_pairs(f, "pairs", pairs)?;
        }
        if let Some(sorted) = &self.sorted_pairs {
            write_pairs(f, "sorted", sorted)?;
        }
        match &self.detail {
            StepDetail::None => {}
            StepDetail::Suffixes(rows) => {
                for row in rows {
                    write!(f, "\n  {:>4}  {:>4}  {}", row.index, row.rank, row.suffix)?;
                }
            }
            StepDetail::SortPass(pass) => write!(f, "\n  {pass}")?,
            StepDetail::Refinement { distinct_before, distinct_after } => {
                write!(f, "\n  distinct ranks: {distinct_before} -> {distinct_after}")?
            }
            StepDetail::Final(summary) => {
                write!(f, "\n  suffix array: {:?}", summary.suffix_array)?
            }
        }
        Ok(())
    }
}

/// Ordered, append-only list of steps for one input string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    input: String,
    config: Config,
    steps: Vec<Step>,
}

impl Trace {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    pub fn final_summary(&self) -> Option<&FinalSummary> {
        match self.steps.last().map(Step::detail) {
            Some(StepDetail::Final(summary)) => Some(summary),
            _ => None,
        }
    }

    /// The final suffix array; empty only for a trace that failed validation.
    pub fn suffix_array(&self) -> &[usize] {
        self.final_summary()
            .map(|summary| summary.suffix_array.as_slice())
            .unwrap_or(&[])
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decodes a trace and checks it still has the shape the tracer produces.
    pub fn deserialize(data: &[u8]) -> Result<Trace> {
        let trace: Trace = bincode::deserialize(data)?;
        trace.validate()?;
        Ok(trace)
    }

    pub fn validate(&self) -> Result<()> {
        let n = self.input.chars().count();
        if n == 0 {
            return Err(Error::invariant("trace recorded for an empty input"));
        }
        let last = self
            .steps
            .last()
            .ok_or_else(|| Error::invariant("trace has no steps"))?;
        if last.phase != Phase::Final {
            return Err(Error::invariant(format!("trace ends with a {} step", last.phase)));
        }
        let finals = self.steps.iter().filter(|s| s.phase == Phase::Final).count();
        if finals != 1 {
            return Err(Error::invariant(format!("trace has {finals} final steps")));
        }
        if n == 1 && self.steps.len() != 1 {
            return Err(Error::invariant("a single character traces to one final step"));
        }
        if n > 1 && (self.steps.len() < 2 || self.steps[0].phase != Phase::Init) {
            return Err(Error::invariant("trace does not start with an init step"));
        }
        for step in &self.steps {
            step.ranks.validate()?;
            if step.ranks.len() != n {
                return Err(Error::invariant(format!(
                    "{} step at k={} holds {} ranks for {n} characters",
                    step.phase,
                    step.k,
                    step.ranks.len()
                )));
            }
        }

        let summary = self
            .final_summary()
            .ok_or_else(|| Error::invariant("final step carries no suffix array"))?;
        let mut seen = vec![false; n];
        for &index in &summary.suffix_array {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(Error::invariant(format!("suffix {index} is out of range or repeated"))),
            }
        }
        if summary.suffix_array.len() != n {
            return Err(Error::invariant("suffix array is not a permutation of the input positions"));
        }
        if summary.suffix_array != order_by_rank(&last.ranks) {
            return Err(Error::invariant(format!(
                "suffix array {:?} disagrees with the final ranks {:?}",
                summary.suffix_array,
                last.ranks.suffix_ranks()
            )));
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Collects steps while the tracer runs; [`finish`](TraceRecorder::finish)
/// seals them into a [`Trace`].
pub(crate) struct TraceRecorder {
    input: String,
    config: Config,
    steps: Vec<Step>,
}

impl TraceRecorder {
    pub(crate) fn new(input: &str, config: Config) -> TraceRecorder {
        TraceRecorder {
            input: input.to_string(),
            config,
            steps: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, step: Step) {
        log::trace!("recorded {} step at k={}", step.phase, step.k);
        self.steps.push(step);
    }

    pub(crate) fn record_all(&mut self, steps: impl IntoIterator<Item = Step>) {
        steps.into_iter().for_each(|step| self.record(step));
    }

    pub(crate) fn finish(self) -> Result<Trace> {
        let trace = Trace {
            input: self.input,
            config: self.config,
            steps: self.steps,
        };
        trace.validate()?;
        Ok(trace)
    }
}
