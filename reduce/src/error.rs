//! Error types for reduce operations

use alloc::collections::TryReserveError;
use core::convert::Infallible;
use thiserror::Error;

/// Error type for reduce operations.
///
/// `E` is the error returned by caller-supplied closures. Infallible reductions
/// (e.g. [`reduce`](crate::Strategy::reduce)) use the default, [`Infallible`].
#[derive(Error, Debug)]
pub enum Error<E = Infallible> {
    #[error("combine failed: {0}")]
    CombineFailed(E),
    #[error("unable to reserve partials for {workers} workers")]
    ResourceExhausted {
        workers: usize,
        #[source]
        source: TryReserveError,
    },
}
