mod engine;
mod workspace;

/// Deterministic generator for test sequences.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    pub fn base(&mut self) -> u8 {
        b"ACGT"[(self.next() >> 62) as usize]
    }

    pub fn below(&mut self, n: u64) -> u64 {
        (self.next() >> 33) % n
    }
}

pub fn random(len: usize, seed: u64) -> Vec<u8> {
    let mut lcg = Lcg::new(seed);
    (0..len).map(|_| lcg.base()).collect()
}

/// Introduce substitutions, deletions and insertions with the given per-mille rate.
pub fn mutate(seq: &[u8], permille: u64, seed: u64) -> Vec<u8> {
    let mut lcg = Lcg::new(seed);
    let mut result = Vec::with_capacity(seq.len() + seq.len() / 10);
    for base in seq {
        if lcg.below(1000) >= permille {
            result.push(*base);
            continue;
        }
        match lcg.below(3) {
            0 => {
                let ind = b"ACGT".iter().position(|x| x == base).unwrap_or(0) as u64;
                result.push(b"ACGT"[((ind + 1 + lcg.below(3)) % 4) as usize]);
            }
            1 => {}
            _ => {
                result.push(*base);
                result.push(lcg.base());
            }
        }
    }
    result
}

/// Remove gaps from an aligned string.
pub fn ungap(aligned: &[u8]) -> Vec<u8> {
    aligned.iter().copied().filter(|x| *x != b'-').collect()
}
