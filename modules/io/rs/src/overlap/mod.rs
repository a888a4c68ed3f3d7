//! Pairwise read overlaps and their M4, M4a and PAF text representations.

mod format;
mod group;
mod reader;
mod record;
mod writer;

pub use format::Format;
pub use group::{group, Grouped};
pub use reader::{parse, Reader};
pub use record::{Record, Side};
pub use writer::Writer;
