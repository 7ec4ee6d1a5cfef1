//! Capabilities that report how many workers may run concurrently.

use core::{fmt, num::NonZeroUsize};

/// Reports the degree of parallelism available to a reduction.
///
/// Strategies query their [`Parallelism`] exactly once per call, so an implementation
/// may change its answer between calls (e.g. to track a cgroup quota).
pub trait Parallelism: Clone + Send + Sync + fmt::Debug + 'static {
    /// Returns the maximum number of workers that may run concurrently.
    fn available(&self) -> NonZeroUsize;
}

/// A fixed degree of parallelism.
///
/// Useful for deterministic tests and for callers that budget threads themselves.
///
/// # Examples
///
/// ```
/// use commonware_reduce::{Fixed, Parallelism};
/// use std::num::NonZeroUsize;
///
/// let four = NonZeroUsize::new(4).unwrap();
/// assert_eq!(Fixed::new(four).available(), four);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fixed(pub NonZeroUsize);

impl Fixed {
    /// Creates a new [`Fixed`] degree of parallelism.
    pub const fn new(workers: NonZeroUsize) -> Self {
        Self(workers)
    }
}

impl Parallelism for Fixed {
    fn available(&self) -> NonZeroUsize {
        self.0
    }
}

#[cfg(feature = "std")]
pub use available::Available;

#[cfg(feature = "std")]
mod available {
    use super::Parallelism;
    use std::num::NonZeroUsize;

    /// The parallelism reported by the host ([`std::thread::available_parallelism`]).
    ///
    /// Falls back to a single worker when the host cannot be queried and on
    /// `wasm32` (no threads).
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Available;

    impl Parallelism for Available {
        #[cfg(target_arch = "wasm32")]
        fn available(&self) -> NonZeroUsize {
            NonZeroUsize::MIN
        }

        #[cfg(not(target_arch = "wasm32"))]
        fn available(&self) -> NonZeroUsize {
            match std::thread::available_parallelism() {
                Ok(workers) => workers,
                Err(err) => {
                    tracing::warn!(?err, "unable to query available parallelism");
                    NonZeroUsize::MIN
                }
            }
        }
    }
}
