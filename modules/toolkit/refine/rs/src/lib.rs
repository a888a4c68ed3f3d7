//! Overlap refinement: re-align coarse read overlaps base by base with the banded diff aligner.

pub use refiner::{Refiner, Stats};

mod refiner;
