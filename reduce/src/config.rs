use core::num::NonZeroUsize;

/// Configuration for the parallel strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// The minimum number of elements each worker must receive before another
    /// worker is added.
    ///
    /// With the default of `1`, a range of `n` elements uses `min(available, n)`
    /// workers. Larger values keep small ranges on the calling thread, where the
    /// cost of spawning workers would dominate.
    pub grain: NonZeroUsize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grain: NonZeroUsize::MIN,
        }
    }
}

impl Config {
    /// Returns the number of workers to use for `len` elements when `available`
    /// workers may run concurrently.
    ///
    /// A result of `0` or `1` means the range is folded sequentially.
    pub fn workers(&self, available: NonZeroUsize, len: usize) -> usize {
        available.get().min(len / self.grain)
    }
}
