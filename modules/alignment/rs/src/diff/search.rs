use eyre::{ensure, OptionExt, Result};

use lrkit_core_rs::seq::nucleotide::GAP;

use super::record::Record;
use super::waypoint::{Layer, Point, Waypoint};
use crate::Alignable;

/// Scratch state of the banded O(ND) diff search.
#[derive(Clone, Debug)]
pub struct Search {
    // Furthest query position reached on each diagonal
    reach: Vec<usize>,
    // x + y of the furthest point on each diagonal
    progress: Vec<usize>,
    waypoints: Vec<Waypoint>,
    layers: Vec<Layer>,
    trace: Vec<Point>,
    max_waypoints: usize,
    max_trace_points: usize,
}

impl Search {
    pub fn new(diagonal_capacity: usize, max_waypoints: usize, max_trace_points: usize) -> Self {
        Self {
            reach: vec![0; diagonal_capacity],
            progress: vec![0; diagonal_capacity],
            waypoints: Vec::new(),
            layers: Vec::new(),
            trace: Vec::new(),
            max_waypoints,
            max_trace_points,
        }
    }

    /// Find the cheapest path from the origin to the end of either sequence inside an adaptive
    /// band. The band keeps only diagonals whose progress is within `band_tolerance` of the best
    /// one and the search gives up once the band gets wider than twice the tolerance or the edit
    /// distance reaches `2 * error_rate * (query.len() + target.len())`.
    ///
    /// The record is reset and receives the end coordinates (and the columns when `traceback`
    /// is set). Returns `true` if either sequence was consumed completely.
    pub fn run<Q, T>(
        &mut self,
        query: &Q,
        target: &T,
        band_tolerance: usize,
        error_rate: f64,
        traceback: bool,
        record: &mut Record,
    ) -> Result<bool>
    where
        Q: Alignable<Symbol = u8>,
        T: Alignable<Symbol = u8>,
    {
        let (qlen, tlen) = (query.len(), target.len());
        record.reset();

        let max_d = (2.0 * error_rate * (qlen + tlen) as f64) as usize;
        self.reach.fill(0);
        self.progress.fill(0);
        self.waypoints.clear();
        self.layers.clear();

        // Diagonal 0 sits in the middle of the arrays, the band may drift either way
        let capacity = self.reach.len() as isize;
        let offset = capacity / 2;
        let slot = |k: isize| (k + offset) as usize;
        let tolerance = band_tolerance as isize;
        let band_size = 2 * tolerance;

        let (mut min_k, mut max_k) = (0isize, 0isize);
        let mut best = -1isize;
        let mut found = None;

        for d in 0..max_d {
            if max_k - min_k > band_size {
                break;
            }

            // Diagonals min_k - 1 ..= max_k + 1 are read or written by this layer
            ensure!(
                min_k - 1 + offset >= 0 && max_k + 1 + offset < capacity,
                "Search band {min_k}..={max_k} at edit distance {d} drifted past the diagonal \
                 capacity ({capacity})"
            );

            let diagonals = ((max_k - min_k) / 2 + 1) as usize;
            ensure!(
                self.waypoints.len() + diagonals <= self.max_waypoints,
                "Search waypoint buffer overflow (more than {} waypoints)",
                self.max_waypoints
            );
            self.layers.push(Layer::new(self.waypoints.len(), min_k));

            for k in (min_k..=max_k).step_by(2) {
                // Predecessor tie-break: k + 1 on the lower edge, k - 1 on the upper edge,
                // otherwise the neighbour that reached further (k - 1 on ties).
                let (predecessor, mut x) = if k == min_k
                    || (k != max_k && self.reach[slot(k - 1)] < self.reach[slot(k + 1)])
                {
                    (k + 1, self.reach[slot(k + 1)])
                } else {
                    (k - 1, self.reach[slot(k - 1)] + 1)
                };
                debug_assert!(x as isize >= k);
                let mut y = (x as isize - k) as usize;

                let start = Point::new(x, y);
                while x < qlen && y < tlen && query.at(x) == target.at(y) {
                    x += 1;
                    y += 1;
                }
                self.waypoints
                    .push(Waypoint::new(d, k, start, Point::new(x, y), predecessor));

                self.reach[slot(k)] = x;
                self.progress[slot(k)] = x + y;
                best = best.max((x + y) as isize);

                if x >= qlen || y >= tlen {
                    found = Some((d, k, x, y));
                    break;
                }
            }

            if let Some((d, k, x, y)) = found {
                record.set_ends(x, y, d);
                if traceback {
                    self.traceback(query, target, d, k, record)?;
                }
                break;
            }

            let (mut new_min, mut new_max) = (max_k, min_k);
            for k in (min_k..=max_k).step_by(2) {
                if self.progress[slot(k)] as isize >= best - tolerance {
                    new_min = new_min.min(k);
                    new_max = new_max.max(k);
                }
            }
            min_k = new_min - 1;
            max_k = new_max + 1;
        }

        Ok(*record.query_end() == qlen || *record.target_end() == tlen)
    }

    fn traceback<Q, T>(
        &mut self,
        query: &Q,
        target: &T,
        distance: usize,
        diagonal: isize,
        record: &mut Record,
    ) -> Result<()>
    where
        Q: Alignable<Symbol = u8>,
        T: Alignable<Symbol = u8>,
    {
        // Walk back to the origin collecting run ends and starts
        self.trace.clear();
        let mut k = diagonal;
        for d in (0..=distance).rev() {
            let waypoint = self
                .layers
                .get(d)
                .and_then(|layer| layer.index(k))
                .and_then(|ind| self.waypoints.get(ind))
                .filter(|x| x.diagonal == k && x.distance == d)
                .copied()
                .ok_or_eyre("Traceback path is broken: missing waypoint")?;

            ensure!(
                self.trace.len() + 2 <= self.max_trace_points,
                "Traceback buffer overflow (more than {} points)",
                self.max_trace_points
            );
            self.trace.push(waypoint.end);
            self.trace.push(waypoint.start);
            k = waypoint.predecessor;
        }

        // Replay from the origin
        let Some(mut current) = self.trace.pop() else {
            return Ok(());
        };
        while let Some(next) = self.trace.pop() {
            if next == current {
                continue;
            }

            if current.x == next.x {
                for y in current.y..next.y {
                    record.push(GAP, *target.at(y))?;
                }
            } else if current.y == next.y {
                for x in current.x..next.x {
                    record.push(*query.at(x), GAP)?;
                }
            } else {
                for (x, y) in (current.x..next.x).zip(current.y..next.y) {
                    record.push(*query.at(x), *target.at(y))?;
                }
            }
            current = next;
        }
        Ok(())
    }
}
