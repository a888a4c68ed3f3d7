use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};

use derive_getters::Getters;
use derive_more::Constructor;
use eyre::{eyre, Result};
use rayon::prelude::*;
use rayon::ThreadPool;
use thread_local::ThreadLocal;

pub use worker::Stats;
use worker::Worker;

use super::workspace::Seed;
use super::{Alignment, Config};

mod worker;

/// A single alignment job: ASCII sequences, the seed, and the acceptance criteria.
#[derive(Clone, PartialEq, Debug, Constructor, Getters)]
pub struct Task<'a> {
    query: &'a [u8],
    target: &'a [u8],
    seed: Seed,
    error_rate: f64,
    min_len: usize,
}

/// Runs many alignments in parallel, each thread reusing its own workspace.
pub struct Engine {
    thread_pool: Option<ThreadPool>,
    config: Config,
    workers: ThreadLocal<RefCell<Worker>>,
}

impl Engine {
    /// Create an engine. Without a thread pool the work runs in the global rayon pool.
    pub fn new(config: Config, thread_pool: Option<ThreadPool>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            thread_pool,
            config,
            workers: ThreadLocal::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Align all tasks. Results follow the order of tasks, rejected alignments are `None`.
    pub fn run(&mut self, tasks: &[Task]) -> Result<Vec<Option<Alignment>>> {
        match self.thread_pool.take() {
            Some(pool) => {
                let result = pool.install(|| self._run(tasks));
                self.thread_pool = Some(pool);
                result
            }
            None => self._run(tasks),
        }
    }

    fn _run(&mut self, tasks: &[Task]) -> Result<Vec<Option<Alignment>>> {
        // Soft-reset all workers
        for worker in self.workers.iter_mut() {
            worker.get_mut().reset();
        }

        let has_failed = AtomicBool::new(false);
        let (workers, config) = (&self.workers, &self.config);
        let results: Vec<Option<Alignment>> = tasks
            .par_iter()
            .enumerate()
            .map(|(ind, task)| {
                if has_failed.load(Ordering::Relaxed) {
                    return None;
                }

                let result = workers
                    .get_or_try(|| Worker::new(config.clone()).map(RefCell::new))
                    .and_then(|worker| worker.borrow_mut().process(task));
                match result {
                    Ok(alignment) => alignment,
                    Err(err) => {
                        has_failed.store(true, Ordering::Relaxed);
                        log::error!("Alignment task {ind} failed: {err:?}");
                        None
                    }
                }
            })
            .collect();

        if has_failed.into_inner() {
            return Err(eyre!("Diff alignment engine failed. See log for details."));
        }
        Ok(results)
    }

    /// Statistics of the last run, summed over all workers.
    pub fn stats(&mut self) -> Stats {
        Worker::aggregate(self.workers.iter_mut().map(|x| x.get_mut()))
    }
}
