use derive_getters::{Dissolve, Getters};
use eyre::{ensure, Result};
use lrkit_core_rs::alignment::Step;
use lrkit_core_rs::loc::Strand;

#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};

/// One read of an overlap. The `start..end` interval is given on the read's `strand`: for the
/// reverse strand, position 0 is the last base of the forward sequence.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Getters, Dissolve)]
pub struct Side {
    name: String,
    strand: Strand,
    start: usize,
    end: usize,
    len: usize,
}

impl Side {
    pub fn new(name: String, strand: Strand, start: usize, end: usize, len: usize) -> Result<Self> {
        ensure!(!name.is_empty(), "Read name can't be empty");
        ensure!(
            start <= end && end <= len,
            "Invalid overlap interval {start}..{end} for {name} of length {len}"
        );
        Ok(Self {
            name,
            strand,
            start,
            end,
            len,
        })
    }

    pub fn span(&self) -> usize {
        self.end - self.start
    }

    /// The same interval expressed on the opposite strand.
    pub fn flipped(&self) -> Self {
        Self {
            name: self.name.clone(),
            strand: self.strand.flipped(),
            start: self.len - self.end,
            end: self.len - self.start,
            len: self.len,
        }
    }

    /// The same interval expressed on the requested strand.
    pub fn on_strand(&self, strand: Strand) -> Self {
        match self.strand == strand {
            true => self.clone(),
            false => self.flipped(),
        }
    }
}

/// Overlap between reads `a` and `b` with the percent identity of the aligned intervals and
/// an optional edit script (`a` is the query, `b` is the target).
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Debug, Clone, PartialEq, Default, Getters, Dissolve)]
pub struct Record {
    a: Side,
    b: Side,
    identity: f64,
    script: Vec<Step<u32>>,
}

impl Record {
    pub fn new(a: Side, b: Side, identity: f64, script: Vec<Step<u32>>) -> Result<Self> {
        ensure!(
            identity.is_finite() && identity >= 0.0,
            "Invalid overlap identity: {identity}"
        );
        Ok(Self {
            a,
            b,
            identity,
            script,
        })
    }

    /// Longest of the two overlapping intervals.
    pub fn aligned_length(&self) -> usize {
        self.a.span().max(self.b.span())
    }

    /// Strand of `b` relative to `a`.
    pub fn relative_strand(&self) -> Strand {
        self.a.strand.relative_to(self.b.strand)
    }

    /// Express the overlap with `a` on the forward strand and `b` on the relative one.
    pub fn normalize(&mut self) {
        if self.a.strand == Strand::Reverse {
            self.a = self.a.flipped();
            self.b = self.b.flipped();
        }
    }
}
