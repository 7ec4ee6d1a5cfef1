//! Random-access sequences that can be reduced.

use alloc::{collections::VecDeque, vec::Vec};
use core::ops::Range;

/// A finite sequence supporting O(1) access to any position.
///
/// Workers jump directly to the start of their block, so sources must support
/// positional access rather than only sequential advancement. A source is shared
/// (read-only) across all workers of a reduction, hence the [`Sync`] bound.
///
/// Items are produced by value. For collections this is a reference to the stored
/// element, for counting ranges it is the counted value itself.
#[allow(clippy::len_without_is_empty)]
pub trait Source: Sync {
    /// The type of items produced by this source.
    type Item;

    /// Returns the number of items in the source.
    fn len(&self) -> usize;

    /// Returns `true` if the source contains no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetches the item at `index`.
    ///
    /// Callers guarantee `index < self.len()`.
    fn fetch(&self, index: usize) -> Self::Item;
}

impl<'a, T: Sync> Source for &'a [T] {
    type Item = &'a T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn fetch(&self, index: usize) -> Self::Item {
        let slice: &'a [T] = *self;
        &slice[index]
    }
}

impl<'a, T: Sync, const N: usize> Source for &'a [T; N] {
    type Item = &'a T;

    fn len(&self) -> usize {
        N
    }

    fn fetch(&self, index: usize) -> Self::Item {
        let array: &'a [T; N] = *self;
        &array[index]
    }
}

impl<'a, T: Sync> Source for &'a Vec<T> {
    type Item = &'a T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn fetch(&self, index: usize) -> Self::Item {
        let vec: &'a Vec<T> = *self;
        &vec[index]
    }
}

impl<'a, T: Sync> Source for &'a VecDeque<T> {
    type Item = &'a T;

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn fetch(&self, index: usize) -> Self::Item {
        let deque: &'a VecDeque<T> = *self;
        &deque[index]
    }
}

impl Source for Range<usize> {
    type Item = usize;

    fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    fn fetch(&self, index: usize) -> Self::Item {
        self.start + index
    }
}

impl Source for Range<u64> {
    type Item = u64;

    fn len(&self) -> usize {
        // Ranges longer than `usize::MAX` are truncated.
        usize::try_from(self.end.saturating_sub(self.start)).unwrap_or(usize::MAX)
    }

    fn fetch(&self, index: usize) -> Self::Item {
        self.start + index as u64
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::vec;

    #[test]
    fn slice_source() {
        let data = [3u8, 1, 4, 1, 5];
        let source = &data[..];
        assert_eq!(Source::len(&source), 5);
        assert!(!Source::is_empty(&source));
        assert_eq!(*source.fetch(0), 3);
        assert_eq!(*source.fetch(4), 5);

        let empty: &[u8] = &[];
        assert!(Source::is_empty(&empty));
    }

    #[test]
    fn array_and_vec_sources() {
        let array = [10u32, 20, 30];
        assert_eq!(Source::len(&&array), 3);
        assert_eq!(*(&array).fetch(1), 20);

        let vec = vec![7i64, 8, 9];
        assert_eq!(Source::len(&&vec), 3);
        assert_eq!(*(&vec).fetch(2), 9);
    }

    #[test]
    fn deque_source_follows_logical_order() {
        // Force the ring buffer to wrap around.
        let mut deque = VecDeque::with_capacity(4);
        deque.extend([1, 2, 3]);
        deque.pop_front();
        deque.push_back(4);
        deque.push_front(0);

        let source = &deque;
        let items: Vec<i32> = (0..Source::len(&source)).map(|i| *source.fetch(i)).collect();
        assert_eq!(items, vec![0, 2, 3, 4]);
    }

    #[test]
    fn counting_sources() {
        let range = 5usize..9;
        assert_eq!(Source::len(&range), 4);
        assert_eq!(range.fetch(0), 5);
        assert_eq!(range.fetch(3), 8);

        #[allow(clippy::reversed_empty_ranges)]
        let backwards = 9usize..5;
        assert!(Source::is_empty(&backwards));

        let wide = 0u64..u64::MAX;
        assert_eq!(Source::len(&wide), usize::MAX);
        assert_eq!(wide.fetch(7), 7);
    }
}
