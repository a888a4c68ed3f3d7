#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};

use crate::num::PrimUInt;

/// `Op` represents a single operation of a pairwise (query vs target) alignment.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum Op {
    /// A target base aligned against a gap in the query (I)
    Insertion,
    /// A query base aligned against a gap in the target (D)
    Deletion,
    /// An aligned pair of bases that is either a match or a mismatch (M)
    Equivalent,
    /// Identical bases (=)
    Match,
    /// Different bases (X)
    Mismatch,
}

impl Op {
    /// Returns `true` if the operation consumes both sequences.
    pub fn is_diagonal(&self) -> bool {
        matches!(self, Op::Match | Op::Mismatch | Op::Equivalent)
    }

    /// Returns the symbol representation of the operation.
    pub fn symbol(&self) -> char {
        match self {
            Op::Insertion => 'I',
            Op::Deletion => 'D',
            Op::Equivalent => 'M',
            Op::Match => '=',
            Op::Mismatch => 'X',
        }
    }

    /// Advances query/target cursors by `len` positions of this operation.
    pub fn apply<Len, Idx>(&self, query: &mut Idx, target: &mut Idx, len: Len)
    where
        Len: PrimUInt + Into<Idx>,
        Idx: PrimUInt,
    {
        match self {
            Op::Insertion => *target = *target + len.into(),
            Op::Deletion => *query = *query + len.into(),
            Op::Equivalent | Op::Mismatch | Op::Match => {
                *query = *query + len.into();
                *target = *target + len.into();
            }
        };
    }
}

impl TryFrom<char> for Op {
    type Error = ();

    /// Tries to convert a character into an `Op`.
    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'I' => Ok(Op::Insertion),
            'D' => Ok(Op::Deletion),
            'M' => Ok(Op::Equivalent),
            '=' => Ok(Op::Match),
            'X' => Ok(Op::Mismatch),
            _ => Err(()),
        }
    }
}
