use std::time::Instant;

use derive_getters::{Dissolve, Getters};
use derive_more::{AddAssign, Constructor};
use eyre::Result;

use super::Task;
use crate::diff::{Alignment, Config, Workspace};

/// Counters collected by a single worker. Totals are obtained by summing all workers.
#[derive(Clone, PartialEq, Debug, Default, AddAssign, Constructor, Dissolve, Getters)]
pub struct Stats {
    /// Alignment tasks processed.
    attempted: usize,
    /// Tasks that produced an alignment.
    accepted: usize,
    /// Tasks rejected as too short.
    rejected: usize,
    /// Columns in all accepted alignments.
    columns: usize,
    /// Time spent aligning, in seconds.
    time_s: f64,
}

#[derive(Dissolve)]
pub struct Worker {
    workspace: Workspace,
    stats: Stats,
}

impl Worker {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            workspace: Workspace::new(config)?,
            stats: Stats::default(),
        })
    }

    pub fn reset(&mut self) {
        self.stats = Stats::default();
    }

    pub fn process(&mut self, task: &Task) -> Result<Option<Alignment>> {
        let launched_at = Instant::now();
        self.stats.attempted += 1;

        let verdict = self.workspace.align(
            task.query(),
            task.target(),
            *task.seed(),
            *task.error_rate(),
            *task.min_len(),
        );
        self.stats.time_s += launched_at.elapsed().as_secs_f64();

        if !verdict?.is_accepted() {
            self.stats.rejected += 1;
            return Ok(None);
        }

        let alignment = self.workspace.output().to_alignment()?;
        self.stats.accepted += 1;
        self.stats.columns += alignment.columns();
        Ok(Some(alignment))
    }

    /// Sum statistics of all workers.
    pub fn aggregate<'a>(workers: impl Iterator<Item = &'a mut Worker>) -> Stats {
        let mut total = Stats::default();
        for worker in workers {
            total += worker.stats.clone();
        }
        total
    }
}
