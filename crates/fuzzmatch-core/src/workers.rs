//! Bounded worker pool for batch scoring
//!
//! Native builds with the `parallel` feature score large batches on rayon,
//! either on a dedicated pool capped at `max_threads` or on the global pool.
//! Output order always matches input order.

use crate::config::WorkerConfig;
use crate::error::Result;

#[cfg(all(not(target_arch = "wasm32"), feature = "parallel"))]
use rayon::prelude::*;

#[derive(Debug)]
pub struct WorkerPool {
    parallel_threshold: usize,
    #[cfg(all(not(target_arch = "wasm32"), feature = "parallel"))]
    pool: Option<rayon::ThreadPool>,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self {
            parallel_threshold: WorkerConfig::default().parallel_threshold,
            #[cfg(all(not(target_arch = "wasm32"), feature = "parallel"))]
            pool: None,
        }
    }
}

impl WorkerPool {
    #[cfg(all(not(target_arch = "wasm32"), feature = "parallel"))]
    pub fn new(config: &WorkerConfig) -> Result<Self> {
        config.validate()?;
        let pool = match config.max_threads {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("fuzzmatch-worker-{i}"))
                    .build()
                    .map_err(|e| {
                        crate::error::MatchError::config(format!("worker pool: {e}"))
                    })?,
            ),
            None => None,
        };
        Ok(Self {
            parallel_threshold: config.parallel_threshold,
            pool,
        })
    }

    #[cfg(any(target_arch = "wasm32", not(feature = "parallel")))]
    pub fn new(config: &WorkerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            parallel_threshold: config.parallel_threshold,
        })
    }

    /// Apply `f` to every item, in parallel once the batch reaches the threshold
    #[cfg(all(not(target_arch = "wasm32"), feature = "parallel"))]
    pub fn map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        if items.len() < self.parallel_threshold {
            return Self::map_sequential(items, f);
        }
        match &self.pool {
            Some(pool) => pool.install(|| items.par_iter().map(&f).collect()),
            None => items.par_iter().map(&f).collect(),
        }
    }

    /// Sequential mapping (WASM or when parallel feature disabled)
    #[cfg(any(target_arch = "wasm32", not(feature = "parallel")))]
    pub fn map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        Self::map_sequential(items, f)
    }

    pub fn map_sequential<T, R, F>(items: &[T], f: F) -> Vec<R>
    where
        F: Fn(&T) -> R,
    {
        items.iter().map(f).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_preserved_above_threshold() {
        let pool = WorkerPool::new(&WorkerConfig {
            max_threads: Some(2),
            parallel_threshold: 4,
        })
        .unwrap();
        let items: Vec<u64> = (0..1_000).collect();
        let doubled = pool.map(&items, |x| x * 2);
        assert_eq!(doubled, items.iter().map(|x| x * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_small_batches_match() {
        let pool = WorkerPool::default();
        let items = ["a", "bb", "ccc"];
        assert_eq!(pool.map(&items, |s| s.len()), vec![1, 2, 3]);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let err = WorkerPool::new(&WorkerConfig {
            max_threads: Some(0),
            parallel_threshold: 1,
        })
        .unwrap_err();
        assert!(matches!(err, crate::error::MatchError::InvalidConfiguration(_)));
    }
}
