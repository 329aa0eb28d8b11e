/// Concurrency management for Aspect Names.
/// Each unit scan is independent, so units are simply spread over rayon's pool.

use anyhow::Result;
use log::info;

/// Initialize the global rayon thread pool.
/// Without an explicit `jobs` count, uses half the cores (at least one).
pub fn init_thread_pool(jobs: Option<usize>) -> Result<usize> {
    let cores = num_cpus::get();
    let workers = jobs.unwrap_or(cores / 2).max(1);

    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()?;

    info!(
        "Initialized thread pool: {} workers (system has {} cores)",
        workers, cores
    );

    Ok(workers)
}
