pub use op::Op;
pub use step::Step;

mod op;
mod step;
