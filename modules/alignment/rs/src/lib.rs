pub use alignable::Alignable;

mod alignable;
pub mod diff;
