use std::thread::available_parallelism;

use eyre::{Result, WrapErr};
use rayon::{ThreadPool, ThreadPoolBuilder};

// Requests past the core count are capped, requests at or below -cores fall back to one thread
fn resolve(requested: isize, cores: usize) -> usize {
    let cores = cores.max(1);
    if requested > 0 {
        (requested as usize).min(cores)
    } else if requested < 0 {
        cores.saturating_sub(requested.unsigned_abs() - 1).max(1)
    } else {
        1
    }
}

/// Number of worker threads for a user request. Negative values count back from all
/// available cores: -1 is "all of them", -2 is "all but one", and so on. Zero means one thread.
pub fn available(requested: isize) -> Result<usize> {
    let cores = available_parallelism()
        .wrap_err("Failed to query the number of available cores")?
        .get();
    Ok(resolve(requested, cores))
}

/// Rayon pool sized with [`available`]. The calling thread joins the pool.
pub fn pool(requested: isize) -> Result<ThreadPool> {
    let threads = available(requested)?;
    log::debug!("Building a thread pool with {threads} threads (requested {requested})");
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .use_current_thread()
        .build()
        .wrap_err_with(|| format!("Failed to build a thread pool with {threads} threads"))
}
