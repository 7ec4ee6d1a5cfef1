//! Fold random-access sequences across a bounded team of workers.
//!
//! This crate provides the [`Strategy`] trait, which reduces a [`Source`] to a single value
//! with a caller-supplied associative operation. Algorithms written against [`Strategy`] can be
//! executed sequentially or in parallel without changing their result (as long as the operation
//! is associative and exact).
//!
//! # Overview
//!
//! **Core Operations:**
//! - [`try_fold`](Strategy::try_fold): Folds a source with fallible seed, fold, and combine steps
//! - [`fold`](Strategy::fold): Like `try_fold`, with infallible steps
//!
//! **Convenience Methods:**
//! - [`reduce`](Strategy::reduce): Folds a source of `A`s with a single binary operation
//! - [`try_reduce`](Strategy::try_reduce): Like `reduce`, with a fallible operation
//!
//! Three implementations are provided:
//!
//! - [`Sequential`]: Folds strictly left-to-right on the current thread (works in `no_std`)
//! - [`Parallel`]: Spawns a team of scoped threads per call (requires `std`)
//! - [`Pool`]: Schedules the same team on a rayon thread pool (requires `std`)
//!
//! # Algorithm
//!
//! A parallel reduction over `n` elements first picks a team size
//! `w = min(available, n / grain)` (see [`Parallelism`] and [`Config`]). When `w <= 1` the
//! source is folded sequentially. Otherwise `[0, n)` is split into `w` contiguous blocks. Each
//! worker seeds its partial from the first element of its block (never from the initial value)
//! and folds the rest of the block in increasing index order. After every worker has finished,
//! the partials are combined in worker order, starting from the initial value:
//!
//! ```text
//! combine(...combine(combine(init, partial[0]), partial[1])..., partial[w - 1])
//! ```
//!
//! The grouping differs from the sequential fold, so the two only agree when the operation is
//! associative. Operations need not be commutative: element order is preserved both within and
//! across blocks. Operations that are associative in theory but not exact in practice (e.g.
//! floating-point addition) may produce different results on different strategies.
//!
//! # Failures
//!
//! A closure that returns an error stops its worker and signals the rest of the team to stop at
//! their next element. Once the team has joined, the error of the lowest failing worker is
//! returned as [`Error::CombineFailed`]. A closure that panics is handled the same way, except
//! that the panic is resumed on the calling thread. If the scratch space for the partials cannot
//! be allocated, [`Error::ResourceExhausted`] is returned before any closure is invoked.
//!
//! The first element of each block is only ever passed to `seed`. An error that `fold` (or the
//! single operation of [`try_reduce`](Strategy::try_reduce)) would raise for that element alone
//! is therefore not raised, and which elements are affected depends on the team size.
//!
//! # Features
//!
//! - `std` (default): Enables the [`Parallel`] and [`Pool`] strategies
//!
//! When the `std` feature is disabled, only [`Sequential`] is available, making this crate
//! suitable for `no_std` environments.
//!
//! # Example
//!
//! ```
//! use commonware_reduce::{Strategy, Sequential};
//!
//! fn concat<S: Strategy>(strategy: &S, words: &[String]) -> String {
//!     strategy
//!         .reduce(words, String::new(), |mut acc, word| {
//!             acc.push_str(word);
//!             acc
//!         })
//!         .unwrap()
//! }
//!
//! let words: Vec<String> = ["a", "b", "c"].into_iter().map(String::from).collect();
//! assert_eq!(concat(&Sequential, &words), "abc");
//! ```

#![doc(
    html_logo_url = "https://commonware.xyz/imgs/rustdoc_logo.svg",
    html_favicon_url = "https://commonware.xyz/favicon.ico"
)]
#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

use cfg_if::cfg_if;
use core::{borrow::Borrow, fmt};

mod config;
pub use config::Config;
mod error;
pub use error::Error;
mod parallelism;
pub use parallelism::{Fixed, Parallelism};
mod source;
pub use source::Source;

cfg_if! {
    if #[cfg(feature = "std")] {
        mod engine;
        mod parallel;
        pub use parallel::Parallel;
        mod pool;
        pub use pool::Pool;
        pub use parallelism::Available;
    }
}

/// A strategy for reducing a [`Source`] to a single value.
///
/// This trait abstracts over sequential and parallel execution, allowing algorithms
/// to be written generically and then executed with different strategies depending
/// on the use case (e.g., sequential for testing/debugging, parallel for production).
pub trait Strategy: Clone + Send + Sync + fmt::Debug + 'static {
    /// Returns the number of workers that would fold a source of `len` elements.
    ///
    /// Values of `0` or `1` mean the source is folded sequentially on the calling thread.
    fn workers(&self, len: usize) -> usize;

    /// Folds `source` into a single value, starting from `init`.
    ///
    /// The result is defined as the sequential left fold
    /// `fold(...fold(fold(init, s[0]), s[1])..., s[n - 1])`. Parallel strategies compute it
    /// by seeding one partial per block with `seed`, folding the rest of each block with `fold`,
    /// and then folding `init` and the partials (in worker order) with `combine`. Both agree
    /// when `combine` is associative and `fold(acc, item) == combine(acc, seed(item))`.
    ///
    /// The first item of each block is passed to `seed` and never to `fold`. Which items are
    /// seeded depends on the number of workers, so a check that `fold` makes on individual items
    /// only runs for the items it actually receives. Checks that must see every item belong in
    /// `seed` or in a validation pass before the fold.
    ///
    /// # Arguments
    ///
    /// - `source`: The sequence to fold over
    /// - `init`: The initial value of the accumulator
    /// - `seed`: Turns the first item of a block into a partial: `item -> acc`
    /// - `fold`: Combines an accumulator with a single item: `(acc, item) -> acc`
    /// - `combine`: Combines two accumulators: `(acc, partial) -> acc`
    ///
    /// # Errors
    ///
    /// Returns [`Error::CombineFailed`] with the first error returned by `fold` or `combine`
    /// and [`Error::ResourceExhausted`] if the partials cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use commonware_reduce::{Error, Strategy, Sequential};
    ///
    /// let strategy = Sequential;
    /// let numbers: Vec<u8> = vec![100, 100, 100];
    ///
    /// // Sum the bytes, failing on overflow
    /// let result = strategy.try_fold(
    ///     &numbers,
    ///     0u8,
    ///     |&n| n,
    ///     |acc, &n| acc.checked_add(n).ok_or("overflow"),
    ///     |acc, partial| acc.checked_add(partial).ok_or("overflow"),
    /// );
    ///
    /// assert!(matches!(result, Err(Error::CombineFailed("overflow"))));
    /// ```
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
        C: Fn(A, A) -> Result<A, E>;

    /// Folds `source` into a single value with infallible steps.
    ///
    /// See [`try_fold`](Self::try_fold) for the meaning of each argument.
    ///
    /// # Examples
    ///
    /// ```
    /// use commonware_reduce::{Strategy, Sequential};
    ///
    /// let strategy = Sequential;
    /// let words = vec!["alpha", "beta", "gamma"];
    ///
    /// let letters = strategy
    ///     .fold(
    ///         &words,
    ///         0usize,
    ///         |word| word.len(),
    ///         |acc, word| acc + word.len(),
    ///         |a, b| a + b,
    ///     )
    ///     .unwrap();
    ///
    /// assert_eq!(letters, 14);
    /// ```
    fn fold<S, A, SD, F, C>(
        &self,
        source: S,
        init: A,
        seed: SD,
        fold: F,
        combine: C,
    ) -> Result<A, Error>
    where
        S: Source,
        A: Send,
        SD: Fn(S::Item) -> A + Sync,
        F: Fn(A, S::Item) -> A + Sync,
        C: Fn(A, A) -> A,
    {
        self.try_fold(
            source,
            init,
            seed,
            |acc, item| Ok(fold(acc, item)),
            |acc, partial| Ok(combine(acc, partial)),
        )
    }

    /// Reduces a source of `A`s with a single fallible operation.
    ///
    /// `combine` folds both elements into partials and partials into the result. Seeds are
    /// clones of the first element of each block, so `combine` never receives those elements on
    /// their own. An error that `combine` raises for one specific element is only reported when
    /// that element is not the first of its block (see [`try_fold`](Self::try_fold)).
    fn try_reduce<S, A, E, F>(&self, source: S, init: A, combine: F) -> Result<A, Error<E>>
    where
        S: Source,
        S::Item: Borrow<A>,
        A: Clone + Send,
        E: Send,
        F: Fn(A, &A) -> Result<A, E> + Sync,
    {
        self.try_fold(
            source,
            init,
            |item| Borrow::<A>::borrow(&item).clone(),
            |acc, item| combine(acc, Borrow::<A>::borrow(&item)),
            |acc, partial| combine(acc, &partial),
        )
    }

    /// Reduces a source of `A`s with a single operation.
    ///
    /// # Examples
    ///
    /// ## Sum of Elements
    ///
    /// ```
    /// use commonware_reduce::{Strategy, Sequential};
    ///
    /// let strategy = Sequential;
    /// let numbers = vec![1u64, 2, 3, 4, 5];
    ///
    /// let sum = strategy.reduce(&numbers, 0u64, |acc, &n| acc + n).unwrap();
    ///
    /// assert_eq!(sum, 15);
    /// ```
    fn reduce<S, A, F>(&self, source: S, init: A, combine: F) -> Result<A, Error>
    where
        S: Source,
        S::Item: Borrow<A>,
        A: Clone + Send,
        F: Fn(A, &A) -> A + Sync,
    {
        self.try_reduce(source, init, |acc, item| Ok(combine(acc, item)))
    }
}

/// A sequential execution strategy.
///
/// This strategy folds strictly left-to-right on the current thread. It defines the
/// reference result every other strategy must agree with, and is useful for:
///
/// - Debugging and testing (deterministic execution)
/// - `no_std` environments where threading is unavailable
/// - Small workloads where parallelism overhead exceeds benefits
/// - Operations that are not associative
///
/// # Examples
///
/// ```
/// use commonware_reduce::{Strategy, Sequential};
///
/// let strategy = Sequential;
/// let data = vec![1u64, 2, 3, 4, 5];
///
/// let sum = strategy.reduce(&data, 0u64, |a, &b| a + b).unwrap();
/// assert_eq!(sum, 15);
/// ```
#[derive(Default, Debug, Clone)]
pub struct Sequential;

impl Strategy for Sequential {
    fn workers(&self, _len: usize) -> usize {
        1
    }

    fn try_fold<S, A, E, SD, F, C>(
        &self,
        source: S,
        init: A,
        _seed: SD,
        fold: F,
        _combine: C,
    ) -> Result<A, Error<E>>
    where
        S: Source,
        A: Send,
        E: Send,
        SD: Fn(S::Item) -> A + Sync,
        F: Fn(A, S::Item) -> Result<A, E> + Sync,
        C: Fn(A, A) -> Result<A, E>,
    {
        (0..source.len())
            .try_fold(init, |acc, index| fold(acc, source.fetch(index)))
            .map_err(Error::CombineFailed)
    }
}
