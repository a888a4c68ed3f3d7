use std::ops::Range;

use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use eyre::{ensure, OptionExt, Result};

use lrkit_core_rs::alignment::{Op, Step};
use lrkit_core_rs::num::{narrow, widen, PrimUInt};
use lrkit_core_rs::seq::nucleotide::{self, GAP};

use super::view::Direction;

/// Raw columns produced by one extension direction, in extension order.
#[derive(Clone, PartialEq, Eq, Debug, Getters)]
pub struct Lane {
    query: Vec<u8>,
    target: Vec<u8>,
    #[getter(skip)]
    capacity: usize,
}

impl Lane {
    pub fn new(capacity: usize) -> Self {
        Self {
            query: Vec::new(),
            target: Vec::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.query.len()
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.target.clear();
    }

    pub fn append(&mut self, query: &[u8], target: &[u8]) -> Result<()> {
        debug_assert_eq!(query.len(), target.len());
        ensure!(
            self.len() + query.len() <= self.capacity,
            "Alignment buffer overflow: more than {} columns",
            self.capacity
        );
        self.query.extend_from_slice(query);
        self.target.extend_from_slice(target);
        Ok(())
    }
}

/// Column statistics of a merged alignment.
#[derive(Copy, Clone, PartialEq, Debug, Default, Constructor, Dissolve, Getters)]
pub struct Summary {
    matches: usize,
    mismatches: usize,
    /// Target bases aligned against a query gap.
    insertions: usize,
    /// Query bases aligned against a target gap.
    deletions: usize,
    /// Percent of matching columns.
    identity: f64,
}

/// Output accumulator of a workspace: raw columns of both extensions and the merged alignment.
#[derive(Clone, PartialEq, Debug, Getters)]
pub struct Output {
    #[getter(skip)]
    left: Lane,
    #[getter(skip)]
    right: Lane,
    /// Gapped query bases (`ACGT-`).
    query: Vec<u8>,
    /// Gapped target bases (`ACGT-`).
    target: Vec<u8>,
    /// `|` for matching columns, `*` otherwise. Filled only for accepted alignments.
    pattern: Vec<u8>,
    query_range: Range<usize>,
    target_range: Range<usize>,
    /// Statistics, available only for accepted alignments.
    summary: Option<Summary>,
    #[getter(skip)]
    capacity: usize,
}

impl Output {
    pub fn new(capacity: usize) -> Self {
        Self {
            left: Lane::new(capacity),
            right: Lane::new(capacity),
            query: Vec::new(),
            target: Vec::new(),
            pattern: Vec::new(),
            query_range: 0..0,
            target_range: 0..0,
            summary: None,
            capacity,
        }
    }

    pub fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
        self.query.clear();
        self.target.clear();
        self.pattern.clear();
        self.query_range = 0..0;
        self.target_range = 0..0;
        self.summary = None;
    }

    /// Raw columns of the leftward (`Backward`) or rightward (`Forward`) extension.
    pub fn lane(&self, direction: Direction) -> &Lane {
        match direction {
            Direction::Backward => &self.left,
            Direction::Forward => &self.right,
        }
    }

    pub(super) fn lane_mut(&mut self, direction: Direction) -> &mut Lane {
        match direction {
            Direction::Backward => &mut self.left,
            Direction::Forward => &mut self.right,
        }
    }

    /// Number of merged columns.
    pub fn columns(&self) -> usize {
        self.query.len()
    }

    /// Join both extensions around the seed: left columns are reversed back into the sequence
    /// order, right columns follow as is.
    pub(super) fn merge(&mut self, seed_query: usize, seed_target: usize) -> Result<()> {
        let total = self.left.len() + self.right.len();
        ensure!(
            total <= self.capacity,
            "Merged alignment is longer than {} columns",
            self.capacity
        );
        self.query.clear();
        self.target.clear();
        self.query.reserve(total);
        self.target.reserve(total);

        let (mut qleft, mut tleft) = (0, 0);
        for (q, t) in self.left.query.iter().rev().zip(self.left.target.iter().rev()) {
            qleft += usize::from(*q != GAP);
            tleft += usize::from(*t != GAP);
            self.query.push(nucleotide::decode(*q));
            self.target.push(nucleotide::decode(*t));
        }

        let (mut qright, mut tright) = (0, 0);
        for (q, t) in self.right.query.iter().zip(self.right.target.iter()) {
            qright += usize::from(*q != GAP);
            tright += usize::from(*t != GAP);
            self.query.push(nucleotide::decode(*q));
            self.target.push(nucleotide::decode(*t));
        }

        let qstart = seed_query
            .checked_sub(qleft)
            .ok_or_eyre("Left extension passed the query start")?;
        let tstart = seed_target
            .checked_sub(tleft)
            .ok_or_eyre("Left extension passed the target start")?;
        self.query_range = qstart..seed_query + qright;
        self.target_range = tstart..seed_target + tright;
        Ok(())
    }

    /// Count column types and fill the match pattern.
    pub(super) fn summarize(&mut self) -> Summary {
        let (mut matches, mut mismatches, mut insertions, mut deletions) = (0, 0, 0, 0);
        self.pattern.clear();
        for (q, t) in self.query.iter().zip(self.target.iter()) {
            if q == t {
                matches += 1;
                self.pattern.push(b'|');
                continue;
            }

            if *q == b'-' {
                insertions += 1;
            } else if *t == b'-' {
                deletions += 1;
            } else {
                mismatches += 1;
            }
            self.pattern.push(b'*');
        }

        let identity = match self.query.len() {
            0 => 0.0,
            total => 100.0 * matches as f64 / total as f64,
        };
        let summary = Summary::new(matches, mismatches, insertions, deletions, identity);
        self.summary = Some(summary);
        summary
    }

    /// Owned copy of the merged alignment. Fails if the last alignment wasn't accepted.
    pub fn to_alignment(&self) -> Result<Alignment> {
        let summary = self
            .summary
            .ok_or_eyre("The last alignment was rejected or never computed")?;
        Ok(Alignment {
            query: String::from_utf8(self.query.clone())?,
            target: String::from_utf8(self.target.clone())?,
            pattern: String::from_utf8(self.pattern.clone())?,
            query_range: self.query_range.clone(),
            target_range: self.target_range.clone(),
            summary,
        })
    }
}

/// An accepted, merged alignment.
#[derive(Clone, PartialEq, Debug, Dissolve, Getters)]
pub struct Alignment {
    query: String,
    target: String,
    pattern: String,
    query_range: Range<usize>,
    target_range: Range<usize>,
    summary: Summary,
}

impl Alignment {
    pub fn columns(&self) -> usize {
        self.query.len()
    }

    /// Base-level edit script: `=` matches, `X` mismatches, `I` target bases against query gaps,
    /// `D` query bases against target gaps.
    pub fn steps<Len: PrimUInt>(&self) -> Result<Vec<Step<Len>>> {
        let mut steps = Vec::new();
        let mut run: Option<(Op, usize)> = None;
        for (q, t) in self.query.bytes().zip(self.target.bytes()) {
            let op = if q == t {
                Op::Match
            } else if q == b'-' {
                Op::Insertion
            } else if t == b'-' {
                Op::Deletion
            } else {
                Op::Mismatch
            };

            match run.as_mut() {
                Some((current, len)) if *current == op => *len += 1,
                _ => {
                    if let Some((op, len)) = run.replace((op, 1)) {
                        Self::push_run(&mut steps, op, len)?;
                    }
                }
            }
        }
        if let Some((op, len)) = run {
            Self::push_run(&mut steps, op, len)?;
        }
        Ok(steps)
    }

    fn push_run<Len: PrimUInt>(steps: &mut Vec<Step<Len>>, op: Op, mut len: usize) -> Result<()> {
        let max = widen(Len::max_value()).unwrap_or(usize::MAX);
        while len > 0 {
            let chunk = len.min(max);
            steps.push(Step::new(op, narrow(chunk)?)?);
            len -= chunk;
        }
        Ok(())
    }

    /// Run-length encoded edit script, e.g. `120=1X33=2I`.
    pub fn rle(&self) -> Result<String> {
        Ok(Step::rle_string(self.steps::<u32>()?.iter()))
    }
}
