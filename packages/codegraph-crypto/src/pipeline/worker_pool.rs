//! Worker pool for per-object phases
//!
//! Tracked objects own their state, so a phase maps over them with rayon.
//! Small sessions run on the calling thread; the pool is only worth its
//! scheduling overhead past the configured threshold.

use crate::config::ParallelConfig;
use crate::errors::{CryptoAnalysisError, Result};
use crate::shared::constants::thread_pool::{CPU_UTILIZATION_PERCENT, MIN_THREADS};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

pub struct WorkerPool {
    pool: ThreadPool,
    threshold: usize,
}

impl WorkerPool {
    pub fn new(config: &ParallelConfig) -> Result<Self> {
        let threads = if config.num_threads == 0 {
            optimal_threads()
        } else {
            config.num_threads
        };
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("crypto-eval-{}", i))
            .build()
            .map_err(|e| CryptoAnalysisError::thread_pool(e.to_string()))?;
        debug!(threads, threshold = config.parallel_threshold, "Worker pool ready");
        Ok(Self {
            pool,
            threshold: config.parallel_threshold,
        })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Map `f` over `items`, in parallel past the threshold; order is kept
    ///
    /// Without the `parallel` feature everything runs on the caller.
    pub fn map<T, R, F>(&self, items: &mut [T], f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(&mut T) -> R + Sync + Send,
    {
        if !cfg!(feature = "parallel") || items.len() < self.threshold {
            items.iter_mut().map(f).collect()
        } else {
            self.pool.install(|| items.par_iter_mut().map(f).collect())
        }
    }
}

/// Worker count from available cores
fn optimal_threads() -> usize {
    let cores = num_cpus::get();
    ((cores as f64 * CPU_UTILIZATION_PERCENT) as usize).max(MIN_THREADS)
}
