//! Banded O(ND) diff alignment of long reads.
//!
//! The aligner starts from a seed (a pair of corresponding positions) and extends the alignment
//! in both directions, window by window. Each window is aligned with a greedy diagonal search
//! restricted to an adaptive band, and the unreliable tail of each window is trimmed before the
//! next one starts.
//!
//! ```no_run
//! use lrkit_alignment_rs::diff::{Config, Seed, Workspace};
//!
//! let mut workspace = Workspace::new(Config::small())?;
//! let verdict = workspace.align(b"ACGTACGTACGT", b"ACGTACCTACGT", Seed::new(6, 6), 0.2, 10)?;
//! if verdict.is_accepted() {
//!     let output = workspace.output();
//!     println!("{:?}", output.summary());
//! }
//! # Ok::<(), eyre::Report>(())
//! ```

pub use config::{Config, Preset};
pub use engine::{Engine, Stats, Task};
pub use extend::Extension;
pub use output::{Alignment, Lane, Output, Summary};
pub use record::Record;
pub use search::Search;
pub use view::{Direction, View};
pub use waypoint::{Layer, Point, Waypoint};
pub use workspace::{Seed, Verdict, Workspace};

mod config;
mod engine;
mod extend;
mod output;
mod record;
mod search;
mod view;
mod waypoint;
mod workspace;
