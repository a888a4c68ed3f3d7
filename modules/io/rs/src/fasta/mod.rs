mod reads;
mod reader;
mod record;

pub use reader::Reader;
pub use reads::{load_reads, Reads};
pub use record::Record;
