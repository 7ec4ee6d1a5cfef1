//! Fork-join reduction on scoped threads.

use crate::{
    engine::{self, Outcome},
    Available, Config, Error, Parallelism, Source, Strategy,
};
use std::thread;
use tracing::warn;

/// A parallel strategy that spawns a team of scoped threads for each call.
///
/// The team is sized once per call as `min(available, len / grain)` (see
/// [`Config::grain`]) and torn down before the call returns. Worker `0` runs on the
/// calling thread. If a worker thread cannot be spawned, its block is folded on
/// the calling thread instead, which does not change the result.
///
/// # Examples
///
/// ```
/// use commonware_reduce::{Config, Fixed, Parallel, Strategy};
/// use std::num::NonZeroUsize;
///
/// let strategy = Parallel::new(Config::default(), Fixed::new(NonZeroUsize::new(4).unwrap()));
///
/// let data: Vec<u64> = (1..=10).collect();
/// let sum = strategy.reduce(&data, 0u64, |acc, &n| acc + n).unwrap();
/// assert_eq!(sum, 55);
/// ```
#[derive(Clone, Debug)]
pub struct Parallel<P: Parallelism = Available> {
    config: Config,
    parallelism: P,
}

impl<P: Parallelism> Parallel<P> {
    /// Creates a new [`Parallel`] strategy that sizes its team with `parallelism`.
    pub const fn new(config: Config, parallelism: P) -> Self {
        Self {
            config,
            parallelism,
        }
    }
}

impl Default for Parallel {
    fn default() -> Self {
        Self::new(Config::default(), Available)
    }
}

impl From<Config> for Parallel {
    fn from(config: Config) -> Self {
        Self::new(config, Available)
    }
}

impl<P: Parallelism> Strategy for Parallel<P> {
    fn workers(&self, len: usize) -> usize {
        self.config.workers(self.parallelism.available(), len)
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
                thread::scope(|scope| {
                    let mut handles = Vec::new();
                    handles
                        .try_reserve_exact(team.workers() - 1)
                        .map_err(|source| Error::ResourceExhausted { workers, source })?;

                    for worker in 1..team.workers() {
                        let spawned = thread::Builder::new()
                            .name(format!("reduce-worker-{worker}"))
                            .spawn_scoped(scope, move || team.run(worker));
                        match spawned {
                            Ok(handle) => handles.push((worker, handle)),
                            Err(err) => {
                                warn!(worker, ?err, "failed to spawn worker");
                                partials.set(worker, team.run(worker));
                            }
                        }
                    }
                    partials.set(0, team.run(0));

                    for (worker, handle) in handles {
                        let outcome = handle.join().unwrap_or_else(Outcome::Panicked);
                        partials.set(worker, outcome);
                    }
                    Ok(())
                })
            },
        )
    }
}
