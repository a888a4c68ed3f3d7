use derive_getters::Getters;
use eyre::{ensure, Result};

use lrkit_core_rs::seq::nucleotide::GAP;

/// Column-wise alignment of a single window. Symbols are base codes with [`GAP`] marking gaps.
#[derive(Clone, PartialEq, Eq, Debug, Getters)]
pub struct Record {
    query: Vec<u8>,
    target: Vec<u8>,
    /// Number of query bases consumed by the alignment.
    query_end: usize,
    /// Number of target bases consumed by the alignment.
    target_end: usize,
    /// Edit distance of the alignment.
    distance: usize,
    #[getter(skip)]
    capacity: usize,
}

impl Record {
    pub fn new(capacity: usize) -> Self {
        Self {
            query: Vec::with_capacity(capacity),
            target: Vec::with_capacity(capacity),
            query_end: 0,
            target_end: 0,
            distance: 0,
            capacity,
        }
    }

    pub fn reset(&mut self) {
        self.query.clear();
        self.target.clear();
        self.query_end = 0;
        self.target_end = 0;
        self.distance = 0;
    }

    /// Number of alignment columns.
    pub fn columns(&self) -> usize {
        self.query.len()
    }

    pub(super) fn set_ends(&mut self, query_end: usize, target_end: usize, distance: usize) {
        self.query_end = query_end;
        self.target_end = target_end;
        self.distance = distance;
    }

    pub(super) fn push(&mut self, query: u8, target: u8) -> Result<()> {
        ensure!(
            self.query.len() < self.capacity,
            "Alignment record overflow: window alignment is longer than {} columns",
            self.capacity
        );
        self.query.push(query);
        self.target.push(target);
        Ok(())
    }

    /// Rewrite every maximal block of gapped columns into aligned pairs followed by the
    /// leftover gaps. The order of bases on each side is preserved.
    pub fn fold_substitutions(&mut self) {
        let total = self.query.len();
        let (mut read, mut write) = (0, 0);

        while read < total {
            if self.query[read] != GAP && self.target[read] != GAP {
                self.query[write] = self.query[read];
                self.target[write] = self.target[read];
                read += 1;
                write += 1;
                continue;
            }

            let mut end = read;
            while end < total && (self.query[end] == GAP || self.target[end] == GAP) {
                end += 1;
            }

            // Output never overtakes the unread bases: the i-th base of a side is at or after
            // read + i while it is written to write + i.
            let (mut qcursor, mut tcursor) = (read, read);
            loop {
                while qcursor < end && self.query[qcursor] == GAP {
                    qcursor += 1;
                }
                while tcursor < end && self.target[tcursor] == GAP {
                    tcursor += 1;
                }

                let query = if qcursor < end { self.query[qcursor] } else { GAP };
                let target = if tcursor < end { self.target[tcursor] } else { GAP };
                if query == GAP && target == GAP {
                    break;
                }

                self.query[write] = query;
                self.target[write] = target;
                write += 1;
                qcursor += 1;
                tcursor += 1;
            }
            read = end;
        }

        self.query.truncate(write);
        self.target.truncate(write);
    }

    /// Scan the columns from the end until `matches` consecutive matching columns are found.
    /// Returns the number of columns before that run and the number of query/target bases in
    /// the scanned tail (the run included). An exhausted scan retains nothing.
    pub fn unreliable_tail(&self, matches: usize) -> (usize, usize, usize) {
        let (mut qtail, mut ttail, mut streak) = (0, 0, 0);
        for col in (0..self.columns()).rev() {
            let (query, target) = (self.query[col], self.target[col]);
            if query != GAP {
                qtail += 1;
            }
            if target != GAP {
                ttail += 1;
            }
            if query == target {
                streak += 1;
            } else {
                streak = 0;
            }
            if streak >= matches {
                return (col, qtail, ttail);
            }
        }
        (0, qtail, ttail)
    }
}
