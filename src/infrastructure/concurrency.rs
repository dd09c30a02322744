/// Concurrency management for ThrowTrace.
/// Configures the rayon pool used to fan chain queries out across sources.

use anyhow::Result;

/// Initialize the global rayon thread pool with controlled worker count.
/// Reserves ~50% of CPU capacity so the analyzer stays polite on shared
/// developer machines.
pub fn init_thread_pool() -> Result<()> {
    let cores = num_cpus::get();
    let workers = std::cmp::max(1, cores / 2);

    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()?;

    println!(
        "[throwtrace] Initialized thread pool: {} workers (system has {} cores)",
        workers, cores
    );

    Ok(())
}
