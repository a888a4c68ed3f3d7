use eyre::{ensure, Result};

use crate::Alignable;

/// Reading direction of a [`View`].
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Direction {
    /// Position `i` is the `i`-th base after the anchor.
    Forward,
    /// Position `i` is the `i`-th base before the anchor, walking towards the sequence start.
    Backward,
}

/// A bounded, direction-aware window over a sequence.
///
/// Forward views start at `anchor` and read to the right. Backward views read to the left of
/// `anchor`: logical position 0 is the base at `anchor - 1`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct View<'a, T> {
    seq: &'a [T],
    anchor: usize,
    len: usize,
    direction: Direction,
}

impl<'a, T> View<'a, T> {
    pub fn new(seq: &'a [T], anchor: usize, len: usize, direction: Direction) -> Result<Self> {
        match direction {
            Direction::Forward => ensure!(
                anchor <= seq.len() && len <= seq.len() - anchor,
                "Forward view {anchor}+{len} is out of bounds for a sequence of length {}",
                seq.len()
            ),
            Direction::Backward => ensure!(
                anchor <= seq.len() && len <= anchor,
                "Backward view {anchor}-{len} is out of bounds for a sequence of length {}",
                seq.len()
            ),
        }
        Ok(Self {
            seq,
            anchor,
            len,
            direction,
        })
    }

    pub fn forward(seq: &'a [T], anchor: usize, len: usize) -> Result<Self> {
        Self::new(seq, anchor, len, Direction::Forward)
    }

    pub fn backward(seq: &'a [T], anchor: usize, len: usize) -> Result<Self> {
        Self::new(seq, anchor, len, Direction::Backward)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Sub-view of `len` positions starting at the logical position `offset`.
    pub fn window(&self, offset: usize, len: usize) -> Result<Self> {
        ensure!(
            offset <= self.len && len <= self.len - offset,
            "Window {offset}+{len} exceeds the view length {}",
            self.len
        );
        let anchor = match self.direction {
            Direction::Forward => self.anchor + offset,
            Direction::Backward => self.anchor - offset,
        };
        Ok(Self {
            seq: self.seq,
            anchor,
            len,
            direction: self.direction,
        })
    }
}

impl<T> Alignable for View<'_, T> {
    type Symbol = T;

    #[inline(always)]
    fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    fn at(&self, pos: usize) -> &Self::Symbol {
        debug_assert!(pos < self.len);
        match self.direction {
            Direction::Forward => &self.seq[self.anchor + pos],
            Direction::Backward => &self.seq[self.anchor - pos - 1],
        }
    }
}
