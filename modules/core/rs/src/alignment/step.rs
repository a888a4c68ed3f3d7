use std::borrow::Borrow;
use std::fmt::Display;

use derive_getters::{Dissolve, Getters};
use eyre::{bail, eyre, Result, WrapErr};

#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};

use super::op::Op;
use crate::num::{widen, PrimUInt};

/// A run of identical operations in an alignment (edit script) between a query and a target.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Getters, Dissolve)]
pub struct Step<Len: PrimUInt> {
    /// The length of the operation, e.g. the number of consequent matches or gaps.
    /// Guaranteed to be greater than zero.
    len: Len,
    /// The alignment operation
    op: Op,
}

impl<Len: PrimUInt> Step<Len> {
    pub fn new(op: Op, len: Len) -> Result<Self> {
        if len.is_zero() {
            return Err(eyre!("Step length must be greater than zero"));
        }
        Ok(Self { len, op })
    }

    /// Merge adjacent steps with identical operations in place.
    /// If the sum of the lengths exceeds the maximum value of the step size, the step is divided accordingly.
    pub fn collapse(steps: &mut Vec<Step<Len>>) {
        if steps.len() < 2 {
            return;
        }

        let (mut writep, mut readp) = (0, 1);
        while readp < steps.len() {
            if steps[writep].op == steps[readp].op {
                match steps[writep].len.checked_add(&steps[readp].len) {
                    Some(x) => steps[writep].len = x,
                    None => {
                        steps[readp].len =
                            steps[readp].len - (Len::max_value() - steps[writep].len);
                        debug_assert!(steps[readp].len > Len::zero());
                        steps[writep].len = Len::max_value();

                        writep += 1;
                        steps[writep] = steps[readp];
                    }
                }
            } else {
                writep += 1;
                steps[writep] = steps[readp];
            }
            readp += 1;
        }
        steps.truncate(writep + 1);
    }

    /// Run-length encoded (CIGAR-like) representation of the steps, e.g. `10=1X3=2I`.
    pub fn rle_string(steps: impl Iterator<Item: Borrow<Step<Len>>>) -> String
    where
        Len: Display,
    {
        // 2 digits + 1 symbol is an average length of a step
        let hint = match steps.size_hint() {
            (_, Some(upper)) => upper * 3,
            (lower, _) => lower * 3,
        };

        let mut result = String::with_capacity(hint);
        for step in steps {
            let step = step.borrow();
            result.push_str(&step.len().to_string());
            result.push(step.op().symbol());
        }
        result
    }

    /// Parse a run-length encoded string produced by [`Step::rle_string`] (or a CIGAR restricted
    /// to `I`, `D`, `M`, `=` and `X`).
    pub fn parse_rle(rle: &str) -> Result<Vec<Step<Len>>> {
        let mut steps = Vec::with_capacity(rle.len() / 2);
        let mut digits = 0;
        for (ind, symbol) in rle.char_indices() {
            if symbol.is_ascii_digit() {
                digits += 1;
                continue;
            }
            if digits == 0 {
                bail!("Missing length before operation '{symbol}' in {rle}");
            }

            let op = Op::try_from(symbol)
                .map_err(|_| eyre!("Unsupported operation '{symbol}' in {rle}"))?;
            let len = Len::from_str_radix(&rle[ind - digits..ind], 10)
                .map_err(|_| eyre!("Invalid step length in {rle}"))?;
            steps.push(Step::new(op, len).wrap_err_with(|| format!("Invalid step in {rle}"))?);
            digits = 0;
        }
        if digits != 0 {
            bail!("Trailing step length without an operation in {rle}");
        }
        Ok(steps)
    }

    /// Number of query and target positions consumed by the steps.
    pub fn spans(steps: impl Iterator<Item: Borrow<Step<Len>>>) -> Result<(usize, usize)> {
        let (mut query, mut target) = (0usize, 0usize);
        for step in steps {
            let step = step.borrow();
            let len = widen(step.len)?;
            match step.op {
                Op::Insertion => target += len,
                Op::Deletion => query += len,
                Op::Equivalent | Op::Match | Op::Mismatch => {
                    query += len;
                    target += len;
                }
            }
        }
        Ok((query, target))
    }
}
