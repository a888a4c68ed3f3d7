pub use packed::DnaSeq;

pub mod nucleotide;
mod packed;
