use std::fmt::Debug;

use eyre::{OptionExt, Result};

/// T values are primitive integers
pub trait PrimInt: ::num::PrimInt + Debug + Default {}
impl<T: ::num::PrimInt + Debug + Default> PrimInt for T {}

/// T values are non-negative primitive integers
pub trait PrimUInt: PrimInt + ::num::Unsigned {}

impl<T: PrimInt + ::num::Unsigned> PrimUInt for T {}

/// Convert a sequence coordinate into a narrower unsigned type, failing instead of truncating.
pub fn narrow<T: PrimUInt>(value: usize) -> Result<T> {
    T::from(value).ok_or_eyre("Value does not fit into the target integer type")
}

/// Convert an unsigned value back into a sequence coordinate.
pub fn widen<T: PrimUInt>(value: T) -> Result<usize> {
    value
        .to_usize()
        .ok_or_eyre("Value does not fit into the platform usize")
}
