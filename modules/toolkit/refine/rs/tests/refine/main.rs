use eyre::{OptionExt, Result};
use rayon::ThreadPoolBuilder;

use lrkit_alignment_rs::diff::Config;
use lrkit_core_rs::alignment::Step;
use lrkit_core_rs::loc::Strand;
use lrkit_core_rs::seq::{nucleotide, DnaSeq};
use lrkit_io_rs::fasta::Reads;
use lrkit_io_rs::overlap::{Record, Side};
use lrkit_refine_rs::Refiner;

const ERROR_RATE: f64 = 0.15;
const MIN_LEN: usize = 500;

/// Deterministic generator for test sequences.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn base(&mut self) -> u8 {
        b"ACGT"[(self.next() >> 62) as usize]
    }

    fn below(&mut self, n: u64) -> u64 {
        (self.next() >> 33) % n
    }
}

fn random(len: usize, seed: u64) -> Vec<u8> {
    let mut lcg = Lcg(seed);
    (0..len).map(|_| lcg.base()).collect()
}

/// Substitutions, deletions and insertions with the given per-mille rate.
fn mutate(seq: &[u8], permille: u64, seed: u64) -> Vec<u8> {
    let mut lcg = Lcg(seed);
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

/// Three reads cut from the same genome: `r1` covers its first 2000 bases, `r2` the last 2000
/// bases, `r3` is `r2` sequenced from the opposite strand and `r4` is a noisy copy of `r2`.
fn reads() -> Result<Reads> {
    let genome = random(3000, 7);
    let mut reads = Reads::new();
    reads.insert("r1".to_owned(), DnaSeq::new(&genome[..2000])?);
    reads.insert("r2".to_owned(), DnaSeq::new(&genome[1000..])?);
    reads.insert(
        "r3".to_owned(),
        DnaSeq::new(&nucleotide::reverse_complement(&genome[1000..]))?,
    );
    reads.insert(
        "r4".to_owned(),
        DnaSeq::new(&mutate(&genome[1000..], 20, 11))?,
    );
    Ok(reads)
}

fn overlap(
    a: (&str, usize, usize),
    b: (&str, Strand, usize, usize),
    reads: &Reads,
) -> Result<Record> {
    let len = |name: &str| reads.get(name).map_or(2000, |x| x.len());
    Record::new(
        Side::new(a.0.to_owned(), Strand::Forward, a.1, a.2, len(a.0))?,
        Side::new(b.0.to_owned(), b.1, b.2, b.3, len(b.0))?,
        80.0,
        Vec::new(),
    )
}

fn interval(side: &Side) -> (Strand, usize, usize) {
    (*side.strand(), *side.start(), *side.end())
}

#[test]
fn test_refine_overlaps() -> Result<()> {
    let reads = reads()?;
    let overlaps = vec![
        overlap(("r1", 1000, 2000), ("r2", Strand::Forward, 0, 1000), &reads)?,
        overlap(("r1", 1000, 2000), ("r3", Strand::Reverse, 0, 1000), &reads)?,
        overlap(("r1", 1000, 2000), ("r9", Strand::Forward, 0, 1000), &reads)?,
        overlap(("r1", 1100, 1900), ("r2", Strand::Forward, 50, 950), &reads)?,
        overlap(("r1", 1000, 2000), ("r4", Strand::Forward, 0, 1000), &reads)?,
    ];

    let pool = ThreadPoolBuilder::new().num_threads(2).build()?;
    let mut refiner =
        Refiner::new(Config::small(), ERROR_RATE, MIN_LEN, Some(pool))?.with_batch_size(2)?;
    let refined = refiner.run(&reads, &overlaps)?;
    assert_eq!(refined.len(), overlaps.len());

    // Exact overlaps on both strands, including one with coarse intervals
    for ind in [0, 1, 3] {
        let record = refined[ind].as_ref().ok_or_eyre("Overlap wasn't refined")?;
        let strand = *overlaps[ind].b().strand();
        assert_eq!(interval(record.a()), (Strand::Forward, 1000, 2000));
        assert_eq!(interval(record.b()), (strand, 0, 1000));
        assert_eq!(*record.identity(), 100.0);
        assert_eq!(Step::rle_string(record.script().iter()), "1000=");
    }

    // Unknown read
    assert!(refined[2].is_none());

    // Noisy read
    let record = refined[4].as_ref().ok_or_eyre("Overlap wasn't refined")?;
    assert_eq!(interval(record.a()), (Strand::Forward, 1000, 2000));
    assert_eq!(interval(record.b()), (Strand::Forward, 0, 995));
    assert!(*record.identity() > 95.0 && *record.identity() < 100.0);
    assert_eq!(Step::spans(record.script().iter())?, (1000, 995));

    let stats = refiner.stats();
    assert_eq!(
        (*stats.overlaps(), *stats.skipped(), *stats.refined()),
        (5, 1, 4)
    );
    assert_eq!(*stats.alignment().attempted(), 4);
    assert_eq!(*stats.alignment().accepted(), 4);
    Ok(())
}

#[test]
fn test_thread_count_keeps_results() -> Result<()> {
    let reads = reads()?;
    let overlaps = vec![
        overlap(("r1", 1000, 2000), ("r2", Strand::Forward, 0, 1000), &reads)?,
        overlap(("r1", 1000, 2000), ("r3", Strand::Reverse, 0, 1000), &reads)?,
        overlap(("r1", 1000, 2000), ("r4", Strand::Forward, 0, 1000), &reads)?,
    ];

    let mut expected = Refiner::new(Config::small(), ERROR_RATE, MIN_LEN, None)?;
    let expected = expected.run(&reads, &overlaps)?;
    assert!(expected.iter().all(Option::is_some));

    for threads in [1, 2, -1] {
        let mut refiner = Refiner::with_threads(Config::small(), ERROR_RATE, MIN_LEN, threads)?
            .with_batch_size(1)?;
        assert_eq!(refiner.run(&reads, &overlaps)?, expected, "{threads}");
        assert_eq!(*refiner.stats().refined(), 3);
    }
    Ok(())
}

#[test]
fn test_short_alignments_are_rejected() -> Result<()> {
    let reads = reads()?;
    let overlaps = vec![overlap(
        ("r1", 1000, 2000),
        ("r2", Strand::Forward, 0, 1000),
        &reads,
    )?];

    let mut refiner = Refiner::new(Config::large(), ERROR_RATE, 1001, None)?;
    assert_eq!(refiner.run(&reads, &overlaps)?, vec![None]);
    assert_eq!(*refiner.stats().alignment().rejected(), 1);

    // Stats are reset between runs
    assert_eq!(refiner.run(&reads, &[])?, vec![]);
    assert_eq!(*refiner.stats().overlaps(), 0);
    Ok(())
}
