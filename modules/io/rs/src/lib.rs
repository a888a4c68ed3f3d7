pub mod compression;
pub mod fasta;
pub mod overlap;
mod traits;

pub use traits::{ReadRecord, WriteRecord};
