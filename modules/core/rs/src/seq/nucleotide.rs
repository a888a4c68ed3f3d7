//! Byte-level helpers for DNA sequences.
//!
//! Bases are encoded as `0..=3` for `A`, `C`, `G`, `T` (either case) and [`GAP`] marks an
//! alignment gap. Everything else, including `N`, has no code.

use eyre::{bail, Result};

/// Code of an alignment gap.
pub const GAP: u8 = 4;

/// Decoding table: code -> ASCII symbol.
pub const DECODE: &[u8; 5] = b"ACGT-";

const ENCODE: [u8; 256] = {
    let mut table = [u8::MAX; 256];
    table[b'A' as usize] = 0;
    table[b'a' as usize] = 0;
    table[b'C' as usize] = 1;
    table[b'c' as usize] = 1;
    table[b'G' as usize] = 2;
    table[b'g' as usize] = 2;
    table[b'T' as usize] = 3;
    table[b't' as usize] = 3;
    table
};

#[inline(always)]
pub fn encode(base: u8) -> Option<u8> {
    match ENCODE[base as usize] {
        u8::MAX => None,
        code => Some(code),
    }
}

/// ASCII symbol for a base/gap code. Codes above [`GAP`] are reported as `N`.
#[inline(always)]
pub fn decode(code: u8) -> u8 {
    DECODE.get(code as usize).copied().unwrap_or(b'N')
}

/// Watson-Crick complement that preserves the case. Gaps map onto themselves, other symbols are
/// returned unchanged.
#[inline(always)]
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        b'a' => b't',
        b'c' => b'g',
        b'g' => b'c',
        b't' => b'a',
        other => other,
    }
}

pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|x| complement(*x)).collect()
}

/// Check that the sequence is made of A/C/G/T only (and N when `allow_n` is set).
pub fn check(seq: &[u8], allow_n: bool) -> bool {
    seq.iter()
        .all(|x| encode(*x).is_some() || (allow_n && matches!(x, b'N' | b'n')))
}

/// Encode ASCII bases, replacing the content of `codes`.
pub fn encode_into(seq: &[u8], codes: &mut Vec<u8>) -> Result<()> {
    codes.clear();
    codes.reserve(seq.len());
    for (ind, base) in seq.iter().enumerate() {
        match encode(*base) {
            Some(code) => codes.push(code),
            None => bail!(
                "Unsupported nucleotide {:?} at position {ind}",
                char::from(*base)
            ),
        }
    }
    Ok(())
}
