use std::fmt::{Display, Formatter};
use std::ops::Range;

use eyre::{ensure, eyre, Result};

#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};

use super::nucleotide;

/// DNA sequence stored with 2 bits per base, four bases per byte. The first base of every group
/// lives in the lowest bits of the byte.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct DnaSeq {
    data: Vec<u8>,
    len: usize,
}

impl DnaSeq {
    /// Pack ASCII bases. Only A/C/G/T (either case) are accepted.
    pub fn new(seq: &[u8]) -> Result<Self> {
        let mut data = vec![0u8; seq.len().div_ceil(4)];
        for (ind, base) in seq.iter().enumerate() {
            let code = nucleotide::encode(*base).ok_or_else(|| {
                eyre!(
                    "Can't pack nucleotide {:?} at position {ind}",
                    char::from(*base)
                )
            })?;
            data[ind / 4] |= code << ((ind % 4) * 2);
        }
        Ok(Self {
            data,
            len: seq.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Code (0..=3) of the base at the given position. Panics if `ind` is out of bounds.
    #[inline(always)]
    pub fn at(&self, ind: usize) -> u8 {
        assert!(ind < self.len, "index {ind} is out of bounds for length {}", self.len);
        (self.data[ind / 4] >> ((ind % 4) * 2)) & 0b11
    }

    fn check_range(&self, range: &Range<usize>) -> Result<()> {
        ensure!(
            range.start <= range.end && range.end <= self.len,
            "Range {}..{} is out of bounds for a sequence of length {}",
            range.start,
            range.end,
            self.len
        );
        Ok(())
    }

    /// Copy of `len` bases starting at `start`.
    pub fn slice(&self, start: usize, len: usize) -> Result<DnaSeq> {
        self.check_range(&(start..start.saturating_add(len)))?;

        let mut data = vec![0u8; len.div_ceil(4)];
        for ind in 0..len {
            data[ind / 4] |= self.at(start + ind) << ((ind % 4) * 2);
        }
        Ok(Self { data, len })
    }

    /// Base codes within the range, optionally reverse complemented.
    pub fn codes(&self, range: Range<usize>, revcomp: bool) -> Result<Vec<u8>> {
        self.check_range(&range)?;
        let codes = if revcomp {
            range.rev().map(|ind| 3 - self.at(ind)).collect()
        } else {
            range.map(|ind| self.at(ind)).collect()
        };
        Ok(codes)
    }

    /// Upper-case ASCII bases within the range, optionally reverse complemented.
    pub fn to_ascii(&self, range: Range<usize>, revcomp: bool) -> Result<Vec<u8>> {
        let mut codes = self.codes(range, revcomp)?;
        for code in codes.iter_mut() {
            *code = nucleotide::decode(*code);
        }
        Ok(codes)
    }
}

impl Display for DnaSeq {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for ind in 0..self.len {
            write!(f, "{}", char::from(nucleotide::decode(self.at(ind))))?;
        }
        Ok(())
    }
}
