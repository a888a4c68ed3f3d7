use std::ops::Range;

use derive_getters::{Dissolve, Getters};
use eyre::{ensure, Result, WrapErr};
use rayon::ThreadPool;

use lrkit_alignment_rs::diff::{self, Alignment, Config, Engine, Seed, Task};
use lrkit_core_rs::loc::Strand;
use lrkit_core_rs::parallelism;
use lrkit_io_rs::fasta::Reads;
use lrkit_io_rs::overlap::{Record, Side};

/// Counters of the last [`Refiner::run`].
#[derive(Clone, PartialEq, Debug, Default, Dissolve, Getters)]
pub struct Stats {
    /// Overlaps submitted for refinement.
    overlaps: usize,
    /// Overlaps skipped because their reads are unknown or inconsistent with the overlap.
    skipped: usize,
    /// Overlaps with an accepted alignment.
    refined: usize,
    /// Aligner counters summed over all batches.
    alignment: diff::Stats,
}

/// Sequences of an overlap oriented as its sides and the alignment seed.
struct Prepared {
    query: Vec<u8>,
    target: Vec<u8>,
    seed: Seed,
}

/// Re-aligns overlaps between reads with the banded diff aligner. Each overlap is aligned from
/// the midpoints of its intervals, refined overlaps carry the aligned intervals, the identity of
/// the alignment and its base-level edit script.
pub struct Refiner {
    engine: Engine,
    error_rate: f64,
    min_len: usize,
    batch_size: usize,
    stats: Stats,
}

impl Refiner {
    /// Number of overlaps whose sequences are materialized at once.
    pub const DEFAULT_BATCH_SIZE: usize = 1024;

    pub fn new(
        config: Config,
        error_rate: f64,
        min_len: usize,
        thread_pool: Option<ThreadPool>,
    ) -> Result<Self> {
        ensure!(
            error_rate.is_finite() && (0.0..=1.0).contains(&error_rate),
            "Error rate must be within [0, 1], got {error_rate}"
        );
        Ok(Self {
            engine: Engine::new(config, thread_pool)?,
            error_rate,
            min_len,
            batch_size: Self::DEFAULT_BATCH_SIZE,
            stats: Stats::default(),
        })
    }

    /// Same as [`Refiner::new`], with a dedicated pool of `threads` workers. Negative values
    /// count back from all available cores, see [`parallelism::available`].
    pub fn with_threads(
        config: Config,
        error_rate: f64,
        min_len: usize,
        threads: isize,
    ) -> Result<Self> {
        let pool = parallelism::pool(threads)?;
        Self::new(config, error_rate, min_len, Some(pool))
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Result<Self> {
        ensure!(batch_size > 0, "Batch size must be positive");
        self.batch_size = batch_size;
        Ok(self)
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Refine all overlaps. The result follows the order of `overlaps`: `None` marks overlaps
    /// that were skipped or whose alignment was rejected.
    pub fn run(&mut self, reads: &Reads, overlaps: &[Record]) -> Result<Vec<Option<Record>>> {
        self.stats = Stats::default();

        let mut refined = Vec::with_capacity(overlaps.len());
        for batch in overlaps.chunks(self.batch_size) {
            let prepared = batch
                .iter()
                .map(|overlap| self.prepare(reads, overlap))
                .collect::<Result<Vec<_>>>()?;

            let tasks: Vec<Task> = prepared
                .iter()
                .flatten()
                .map(|x| Task::new(&x.query, &x.target, x.seed, self.error_rate, self.min_len))
                .collect();
            let mut alignments = self.engine.run(&tasks)?.into_iter();
            self.stats.alignment += self.engine.stats();

            for (overlap, prepared) in batch.iter().zip(&prepared) {
                let alignment = match prepared {
                    Some(_) => alignments.next().flatten(),
                    None => None,
                };
                let record = match alignment {
                    Some(alignment) => Some(Self::refined(overlap, &alignment).wrap_err_with(
                        || {
                            format!(
                                "Failed to refine overlap {} vs {}",
                                overlap.a().name(),
                                overlap.b().name()
                            )
                        },
                    )?),
                    None => None,
                };
                refined.push(record);
            }

            self.stats.overlaps += batch.len();
            self.stats.skipped += prepared.iter().filter(|x| x.is_none()).count();
        }
        self.stats.refined = refined.iter().filter(|x| x.is_some()).count();

        log::info!(
            "Refined {}/{} overlaps ({} skipped) in {:.2}s of alignment time",
            self.stats.refined,
            self.stats.overlaps,
            self.stats.skipped,
            self.stats.alignment.time_s()
        );
        Ok(refined)
    }

    fn prepare(&self, reads: &Reads, overlap: &Record) -> Result<Option<Prepared>> {
        let max_seq_size = *self.engine.config().max_seq_size();
        let (Some(query), Some(target)) = (
            Self::oriented(reads, overlap.a(), max_seq_size)?,
            Self::oriented(reads, overlap.b(), max_seq_size)?,
        ) else {
            return Ok(None);
        };

        let seed = Seed::new(midpoint(overlap.a()), midpoint(overlap.b()));
        Ok(Some(Prepared {
            query,
            target,
            seed,
        }))
    }

    /// ASCII sequence of the read on the strand of the overlap side.
    fn oriented(reads: &Reads, side: &Side, max_seq_size: usize) -> Result<Option<Vec<u8>>> {
        let Some(read) = reads.get(side.name().as_str()) else {
            log::warn!("Skipping overlap with unknown read {}", side.name());
            return Ok(None);
        };
        if read.len() != *side.len() {
            log::warn!(
                "Skipping overlap with read {}: its length is {}, but the overlap reports {}",
                side.name(),
                read.len(),
                side.len()
            );
            return Ok(None);
        }
        if read.len() > max_seq_size {
            log::warn!(
                "Skipping overlap with read {}: {} bases exceed the aligner limit of {max_seq_size}",
                side.name(),
                read.len()
            );
            return Ok(None);
        }

        let seq = read.to_ascii(0..read.len(), *side.strand() == Strand::Reverse)?;
        Ok(Some(seq))
    }

    fn refined(overlap: &Record, alignment: &Alignment) -> Result<Record> {
        let side = |side: &Side, range: &Range<usize>| {
            Side::new(
                side.name().clone(),
                *side.strand(),
                range.start,
                range.end,
                *side.len(),
            )
        };

        Record::new(
            side(overlap.a(), alignment.query_range())?,
            side(overlap.b(), alignment.target_range())?,
            *alignment.summary().identity(),
            alignment.steps::<u32>()?,
        )
    }
}

fn midpoint(side: &Side) -> usize {
    (side.start() + side.end()) / 2
}
