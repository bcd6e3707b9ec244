use core::fmt;
use core::iter::FusedIterator;
use core::mem::ManuallyDrop;
use core::ptr;
use core::slice;

use av_raw::RawMemory;

use crate::Vector;
use crate::container::grown_capacity;

// -----------------------------------------------------------------------------
// IntoIter

/// An owning iterator over the elements of a [`Vector`].
///
/// Owns the block; elements not yielded are dropped with the iterator.
///
/// # Examples
///
/// ```
/// use av_vec::vector;
///
/// let mut iter = vector![1, 2, 3].into_iter();
/// assert_eq!(iter.next(), Some(1));
/// assert_eq!(iter.next_back(), Some(3));
/// assert_eq!(iter.as_slice(), &[2]);
/// ```
pub struct IntoIter<T> {
    memory: RawMemory<T>,
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    /// Returns the elements not yet yielded.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[start, end)` is initialized.
        unsafe { slice::from_raw_parts(self.memory.slot(self.start), self.end - self.start) }
    }

    /// Returns the elements not yet yielded, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: `[start, end)` is initialized.
        unsafe {
            slice::from_raw_parts_mut(self.memory.slot_mut(self.start), self.end - self.start)
        }
    }
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let rest = ptr::slice_from_raw_parts_mut(self.memory.slot_mut(self.start), self.end - self.start);
        // SAFETY: `[start, end)` is initialized and never yielded.
        unsafe {
            ptr::drop_in_place(rest);
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let index = self.start;
        self.start += 1;
        // SAFETY: `index` was in `[start, end)` and is now outside it.
        Some(unsafe { ptr::read(self.memory.slot(index)) })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: `end` was in `[start, end)` and is now outside it.
        Some(unsafe { ptr::read(self.memory.slot(self.end)) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

// -----------------------------------------------------------------------------
// IntoIterator

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> IntoIter<T> {
        let mut this = ManuallyDrop::new(self);
        let mut memory = RawMemory::new();
        // The left-behind empty block owns nothing, so skipping its drop is fine.
        this.memory.swap(&mut memory);

        IntoIter {
            memory,
            start: 0,
            end: this.len,
        }
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> slice::Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Vector<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.iter_mut()
    }
}

// -----------------------------------------------------------------------------
// Collect

impl<T> FromIterator<T> for Vector<T> {
    /// Collects by repeated [`push_back`](Vector::push_back), starting from
    /// the iterator's lower size bound.
    #[track_caller]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut vector = Vector::with_capacity(iter.size_hint().0);
        for item in iter {
            vector.push_back(item);
        }
        vector
    }
}

impl<T> Extend<T> for Vector<T> {
    /// Appends every item, growing by the usual doubling steps.
    ///
    /// The lower size bound is reserved up front, but never less than the
    /// next doubled capacity, so repeated small extends stay amortized.
    #[track_caller]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let wanted = self.len.saturating_add(iter.size_hint().0);
        if wanted > self.capacity() {
            match grown_capacity(self.len) {
                Ok(doubled) => self.reserve(wanted.max(doubled)),
                Err(err) => err.handle(),
            }
        }
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for Vector<T> {
    #[track_caller]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

// -----------------------------------------------------------------------------
// Tests
