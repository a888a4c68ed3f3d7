use derive_more::Constructor;

/// Position in the edit graph: `x` bases of the query and `y` bases of the target are consumed.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Constructor)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

/// Greedy matching run explored on diagonal `diagonal` at edit distance `distance`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Constructor)]
pub struct Waypoint {
    pub distance: usize,
    pub diagonal: isize,
    pub start: Point,
    pub end: Point,
    pub predecessor: isize,
}

/// Waypoints of a single edit distance are stored contiguously, ordered by diagonal with a step
/// of 2, starting with `min_diagonal` at index `first`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Constructor)]
pub struct Layer {
    pub first: usize,
    pub min_diagonal: isize,
}

impl Layer {
    #[inline(always)]
    pub fn index(&self, diagonal: isize) -> Option<usize> {
        let shift = diagonal - self.min_diagonal;
        if shift < 0 || shift % 2 != 0 {
            return None;
        }
        Some(self.first + (shift / 2) as usize)
    }
}
