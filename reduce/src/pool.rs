//! Fork-join reduction on a rayon thread pool.

use crate::{engine, Config, Error, Source, Strategy};
use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefMutIterator, ParallelIterator},
    ThreadPool,
};
use std::{num::NonZeroUsize, sync::Arc};

/// A parallel strategy backed by a rayon thread pool.
///
/// Blocks are partitioned exactly as in [`Parallel`](crate::Parallel), but each
/// worker is scheduled as a rayon task on the wrapped [`ThreadPool`] rather than on
/// a dedicated thread. The team is sized as `min(threads, len / grain)`.
///
/// # Thread Pool Ownership
///
/// `Pool` holds an [`Arc<ThreadPool>`], so it can be cheaply cloned and shared
/// across threads. Multiple [`Pool`] instances can share the same underlying
/// thread pool.
///
/// # Examples
///
/// ```
/// use commonware_reduce::{Pool, Strategy};
/// use rayon::ThreadPoolBuilder;
/// use std::sync::Arc;
///
/// let pool = Arc::new(ThreadPoolBuilder::new().num_threads(2).build().unwrap());
/// let strategy = Pool::from(pool);
///
/// let data: Vec<i64> = (0..1000).collect();
/// let sum = strategy.reduce(&data, 0i64, |acc, &n| acc + n).unwrap();
/// assert_eq!(sum, 499500);
/// ```
#[derive(Debug, Clone)]
pub struct Pool {
    thread_pool: Arc<ThreadPool>,
    config: Config,
}

impl Pool {
    /// Creates a new [`Pool`] strategy with the given [`ThreadPool`].
    pub const fn new(thread_pool: Arc<ThreadPool>, config: Config) -> Self {
        Self {
            thread_pool,
            config,
        }
    }
}

impl From<Arc<ThreadPool>> for Pool {
    fn from(thread_pool: Arc<ThreadPool>) -> Self {
        Self::new(thread_pool, Config::default())
    }
}

impl Strategy for Pool {
    fn workers(&self, len: usize) -> usize {
        let threads =
            NonZeroUsize::new(self.thread_pool.current_num_threads()).unwrap_or(NonZeroUsize::MIN);
        self.config.workers(threads, len)
    }

    fn try_fold<S, A, E, SD, F, C>(
        &self,
        source: S,
        init: A,
        seed: SD,
        fold: F,
        combine: C,
    ) -> Result<A, Error<E>>
    where
        S: Source,
        A: Send,
        E: Send,
        SD: Fn(S::Item) -> A + Sync,
        F: Fn(A, S::Item) -> Result<A, E> + Sync,
        C: Fn(A, A) -> Result<A, E>,
    {
        let workers = self.workers(source.len());
        engine::fork_join(
            workers,
            source,
            init,
            seed,
            fold,
            combine,
            |team, partials| {
                self.thread_pool.install(|| {
                    partials
                        .slots_mut()
                        .par_iter_mut()
                        .with_max_len(1)
                        .enumerate()
                        .for_each(|(worker, slot)| *slot = Some(team.run(worker)));
                });
                Ok(())
            },
        )
    }
}
