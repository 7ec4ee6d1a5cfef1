//! Fork-join machinery shared by the parallel strategies.
//!
//! A reduction over `len` elements with `workers` workers splits `[0, len)` into
//! contiguous blocks, one per worker. Each worker seeds its partial from the first
//! element of its block and folds the remainder in increasing index order. Once
//! every worker has finished, the partials are combined in worker order, starting
//! from the caller's initial value.

use crate::{Error, Sequential, Source, Strategy};
use std::{
    any::Any,
    ops::Range,
    panic::{self, AssertUnwindSafe},
    sync::atomic::{AtomicBool, Ordering},
};
use tracing::debug;

/// The result of folding one block.
pub(crate) enum Outcome<A, E> {
    /// The block was folded into a partial.
    Done(A),
    /// The fold failed.
    Failed(E),
    /// The fold panicked.
    Panicked(Box<dyn Any + Send + 'static>),
    /// Another worker failed (or panicked) first.
    Aborted,
}

/// Returns the block of `[0, len)` assigned to `worker`.
///
/// The first `len % workers` blocks hold one extra element. Requires
/// `0 < workers <= len`, so that no block is empty.
pub(crate) fn block(len: usize, workers: usize, worker: usize) -> Range<usize> {
    let base = len / workers;
    let extra = len % workers;
    let start = worker * base + worker.min(extra);
    let size = base + usize::from(worker < extra);
    start..start + size
}

/// State shared (read-only) by every worker of one reduction.
pub(crate) struct Team<'a, S, SD, F> {
    source: &'a S,
    len: usize,
    workers: usize,
    seed: &'a SD,
    fold: &'a F,
    abort: AtomicBool,
}

impl<'a, S: Source, SD, F> Team<'a, S, SD, F> {
    /// Returns the number of workers in the team.
    pub(crate) fn workers(&self) -> usize {
        self.workers
    }

    /// Folds the block assigned to `worker`, capturing any panic.
    pub(crate) fn run<A, E>(&self, worker: usize) -> Outcome<A, E>
    where
        SD: Fn(S::Item) -> A,
        F: Fn(A, S::Item) -> Result<A, E>,
    {
        match panic::catch_unwind(AssertUnwindSafe(|| self.fold_block(worker))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                self.abort.store(true, Ordering::Relaxed);
                Outcome::Panicked(payload)
            }
        }
    }

    fn fold_block<A, E>(&self, worker: usize) -> Outcome<A, E>
    where
        SD: Fn(S::Item) -> A,
        F: Fn(A, S::Item) -> Result<A, E>,
    {
        let Range { start, end } = block(self.len, self.workers, worker);
        if self.abort.load(Ordering::Relaxed) {
            return Outcome::Aborted;
        }
        let mut partial = (self.seed)(self.source.fetch(start));
        for index in start + 1..end {
            if self.abort.load(Ordering::Relaxed) {
                return Outcome::Aborted;
            }
            partial = match (self.fold)(partial, self.source.fetch(index)) {
                Ok(partial) => partial,
                Err(err) => {
                    self.abort.store(true, Ordering::Relaxed);
                    return Outcome::Failed(err);
                }
            };
        }
        Outcome::Done(partial)
    }
}

/// Scoped storage for the partials of one reduction, one slot per worker.
///
/// Dropped (releasing every partial) on all return paths, including unwinding.
pub(crate) struct Partials<A, E> {
    slots: Vec<Option<Outcome<A, E>>>,
}

impl<A, E> Partials<A, E> {
    /// Reserves one empty slot per worker.
    pub(crate) fn reserve(workers: usize) -> Result<Self, Error<E>> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(workers)
            .map_err(|source| Error::ResourceExhausted { workers, source })?;
        slots.resize_with(workers, || None);
        Ok(Self { slots })
    }

    /// Records the outcome of `worker`.
    pub(crate) fn set(&mut self, worker: usize, outcome: Outcome<A, E>) {
        self.slots[worker] = Some(outcome);
    }

    /// Returns the slots, indexed by worker.
    pub(crate) fn slots_mut(&mut self) -> &mut [Option<Outcome<A, E>>] {
        &mut self.slots
    }

    /// Combines the partials in worker order, starting from `init`.
    ///
    /// A panic in any worker is resumed (the lowest worker wins). Otherwise, the
    /// failure of the lowest failing worker is returned.
    fn finish<C>(mut self, init: A, combine: C) -> Result<A, Error<E>>
    where
        C: Fn(A, A) -> Result<A, E>,
    {
        if let Some(worker) = self.position(|outcome| matches!(outcome, Outcome::Panicked(_))) {
            if let Some(Outcome::Panicked(payload)) = self.slots.swap_remove(worker) {
                debug!(worker, "worker panicked");
                panic::resume_unwind(payload);
            }
        }
        if let Some(worker) = self.position(|outcome| matches!(outcome, Outcome::Failed(_))) {
            if let Some(Outcome::Failed(err)) = self.slots.swap_remove(worker) {
                debug!(worker, "worker failed");
                return Err(Error::CombineFailed(err));
            }
        }

        let mut total = init;
        for (worker, slot) in self.slots.into_iter().enumerate() {
            let Some(Outcome::Done(partial)) = slot else {
                unreachable!("worker {worker} did not finish its block");
            };
            total = combine(total, partial).map_err(Error::CombineFailed)?;
        }
        Ok(total)
    }

    fn position(&self, predicate: impl Fn(&Outcome<A, E>) -> bool) -> Option<usize> {
        self.slots.iter().position(|slot| slot.as_ref().is_some_and(&predicate))
    }
}

/// Reduces `source` with `workers` workers, delegating the scheduling of the team to
/// `execute`.
///
/// `execute` must record an outcome for every worker before returning. When there
/// is at most one worker, the range is folded sequentially and `execute` is never
/// called.
pub(crate) fn fork_join<S, A, E, SD, F, C, X>(
    workers: usize,
    source: S,
    init: A,
    seed: SD,
    fold: F,
    combine: C,
    execute: X,
) -> Result<A, Error<E>>
where
    S: Source,
    A: Send,
    E: Send,
    SD: Fn(S::Item) -> A + Sync,
    F: Fn(A, S::Item) -> Result<A, E> + Sync,
    C: Fn(A, A) -> Result<A, E>,
    X: FnOnce(&Team<'_, S, SD, F>, &mut Partials<A, E>) -> Result<(), Error<E>>,
{
    let len = source.len();
    if workers <= 1 {
        debug!(len, workers, "folding sequentially");
        return Sequential.try_fold(source, init, seed, fold, combine);
    }

    let mut partials = Partials::reserve(workers)?;
    debug!(len, workers, "folding in parallel");
    let team = Team {
        source: &source,
        len,
        workers,
        seed: &seed,
        fold: &fold,
        abort: AtomicBool::new(false),
    };
    execute(&team, &mut partials)?;
    partials.finish(init, combine)
}
