use core::ops::{Deref, DerefMut};
use core::ptr;
use core::slice;

use av_raw::{AllocError, RawMemory};

use crate::InsertError;
use crate::error::unwrap_alloc;

// -----------------------------------------------------------------------------
// Vector

/// A contiguous growable array.
///
/// Elements live in a [`RawMemory`] block. The first `len` slots are
/// initialized, the rest are raw. Positions are plain indices; raw pointers
/// from [`as_ptr`](Self::as_ptr) are invalidated by any reallocation.
///
/// Growth doubles the capacity (starting at 1) and always goes through a
/// fresh block that is swapped in once it is fully populated.
///
/// # Examples
///
/// ```
/// use av_vec::Vector;
///
/// let mut v = Vector::new();
/// v.push_back(1);
/// v.push_back(2);
/// v.push_back(3);
///
/// assert_eq!(v.len(), 3);
/// assert_eq!(v.capacity(), 4);
/// assert_eq!(v[1], 2);
/// ```
pub struct Vector<T> {
    pub(crate) memory: RawMemory<T>,
    pub(crate) len: usize,
}

impl<T> Drop for Vector<T> {
    fn drop(&mut self) {
        // SAFETY: `[0, len)` is initialized. The block is released by `memory`.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.memory.as_mut_ptr(),
                self.len,
            ));
        }
    }
}

impl<T> Default for Vector<T> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Construction

impl<T> Vector<T> {
    /// Creates an empty vector. Does not allocate.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            memory: RawMemory::new(),
            len: 0,
        }
    }

    /// Creates an empty vector with room for exactly `capacity` elements.
    #[inline]
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            memory: RawMemory::with_capacity(capacity),
            len: 0,
        }
    }

    /// Fallible version of [`with_capacity`](Self::with_capacity).
    #[inline]
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        Ok(Self {
            memory: RawMemory::try_with_capacity(capacity)?,
            len: 0,
        })
    }

    /// Creates a vector of `len` elements, each produced by `f`.
    ///
    /// The block is sized exactly to `len`. If `f` panics, the elements
    /// built so far are dropped and the block is released.
    ///
    /// # Examples
    ///
    /// ```
    /// use av_vec::Vector;
    ///
    /// let mut next = 0;
    /// let v = Vector::with_len_with(3, || {
    ///     next += 10;
    ///     next
    /// });
    /// assert_eq!(v, [10, 20, 30]);
    /// assert_eq!(v.capacity(), 3);
    /// ```
    #[track_caller]
    pub fn with_len_with<F>(len: usize, mut f: F) -> Self
    where
        F: FnMut() -> T,
    {
        unwrap_alloc(Self::try_with_len_with(len, || Ok(f())))
    }

    /// Creates a vector of `len` elements from a fallible constructor.
    ///
    /// On the first `Err`, every element built so far is dropped, the block
    /// is released and the error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use av_vec::{InsertError, Vector};
    ///
    /// let mut budget = 2;
    /// let result = Vector::try_with_len_with(3, || {
    ///     if budget == 0 {
    ///         return Err("out of budget");
    ///     }
    ///     budget -= 1;
    ///     Ok(budget)
    /// });
    /// assert_eq!(result.unwrap_err(), InsertError::Construct("out of budget"));
    /// ```
    pub fn try_with_len_with<E, F>(len: usize, mut f: F) -> Result<Self, InsertError<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        let mut vector = Self::try_with_capacity(len)?;

        while vector.len < len {
            let value = f().map_err(InsertError::Construct)?;
            // SAFETY: `len < capacity` until the loop ends.
            unsafe { vector.push_unchecked(value) };
        }

        Ok(vector)
    }

    /// Moves the contents out of `other`, leaving it empty.
    ///
    /// Never allocates and never touches an element.
    ///
    /// # Examples
    ///
    /// ```
    /// use av_vec::{Vector, vector};
    ///
    /// let mut source = vector![1, 2, 3];
    /// let taken = Vector::take_from(&mut source);
    ///
    /// assert!(source.is_empty());
    /// assert_eq!(source.capacity(), 0);
    /// assert_eq!(taken, [1, 2, 3]);
    /// ```
    #[inline]
    pub fn take_from(other: &mut Self) -> Self {
        let mut vector = Self::new();
        vector.swap(other);
        vector
    }

    /// Exchanges contents with `other`, which receives the old contents of `self`.
    #[inline]
    pub fn assign_take(&mut self, other: &mut Self) {
        self.swap(other);
    }
}

impl<T: Default> Vector<T> {
    /// Creates a vector of `len` default values.
    ///
    /// # Examples
    ///
    /// ```
    /// use av_vec::Vector;
    ///
    /// let v = Vector::<u8>::with_len(4);
    /// assert_eq!(v, [0, 0, 0, 0]);
    /// ```
    #[inline]
    #[track_caller]
    pub fn with_len(len: usize) -> Self {
        Self::with_len_with(len, T::default)
    }
}

// -----------------------------------------------------------------------------
// Basic methods

impl<T> Vector<T> {
    /// Returns the number of live elements.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there are no live elements.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the current block can hold.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.memory.capacity()
    }

    /// Returns a pointer to the first slot.
    ///
    /// Invalidated by any operation that reallocates.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *const T {
        self.memory.as_ptr()
    }

    /// Returns a mutable pointer to the first slot.
    #[inline(always)]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.memory.as_mut_ptr()
    }

    /// Views the live elements as a slice.
    #[inline]
    pub const fn as_slice(&self) -> &[T] {
        // SAFETY: `[0, len)` is initialized, the pointer is aligned and non-null.
        unsafe { slice::from_raw_parts(self.memory.as_ptr(), self.len) }
    }

    /// Views the live elements as a mutable slice.
    #[inline]
    pub const fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: `[0, len)` is initialized, the pointer is aligned and non-null.
        unsafe { slice::from_raw_parts_mut(self.memory.as_mut_ptr(), self.len) }
    }

    /// Returns the element at `index` without bounds checks.
    ///
    /// # Safety
    /// `index < len`. Only checked in debug builds.
    #[inline]
    #[cfg_attr(any(feature = "debug", debug_assertions), track_caller)]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        #[cfg(any(feature = "debug", debug_assertions))]
        assert!(index < self.len, "tried to index out-of-bounds of a vector");

        unsafe { self.memory.get(index) }
    }

    /// Returns the element at `index` mutably without bounds checks.
    ///
    /// # Safety
    /// `index < len`. Only checked in debug builds.
    #[inline]
    #[cfg_attr(any(feature = "debug", debug_assertions), track_caller)]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        #[cfg(any(feature = "debug", debug_assertions))]
        assert!(index < self.len, "tried to index out-of-bounds of a vector");

        unsafe { self.memory.get_mut(index) }
    }

    /// Exchanges storage and length with `other`.
    ///
    /// Never allocates and never touches an element.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        self.memory.swap(&mut other.memory);
        core::mem::swap(&mut self.len, &mut other.len);
    }

    /// Writes `value` into the first free slot.
    ///
    /// # Safety
    /// `len < capacity`.
    #[inline]
    pub(crate) unsafe fn push_unchecked(&mut self, value: T) {
        debug_assert!(self.len < self.capacity());

        unsafe {
            ptr::write(self.memory.slot_mut(self.len), value);
        }
        self.len += 1;
    }
}

// -----------------------------------------------------------------------------
// Capacity

impl<T> Vector<T> {
    /// Grows the block to exactly `capacity` slots.
    ///
    /// Does nothing if the block is already large enough, in which case
    /// element addresses are preserved.
    ///
    /// # Examples
    ///
    /// ```
    /// use av_vec::{Vector, vector};
    ///
    /// let mut v = vector![1, 2, 3];
    /// v.reserve(10);
    /// assert_eq!(v.capacity(), 10);
    ///
    /// let first = v.as_ptr();
    /// v.reserve(4);
    /// assert_eq!(v.capacity(), 10);
    /// assert_eq!(v.as_ptr(), first);
    /// ```
    #[inline]
    #[track_caller]
    pub fn reserve(&mut self, capacity: usize) {
        if let Err(err) = self.try_reserve(capacity) {
            err.handle();
        }
    }

    /// Fallible version of [`reserve`](Self::reserve).
    ///
    /// On error the vector is unchanged.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), AllocError> {
        if capacity <= self.capacity() {
            return Ok(());
        }

        let mut fresh = allocate_logged(capacity)?;

        // SAFETY: `fresh` has room for `len` and is disjoint from `memory`.
        unsafe {
            self.relocate(0..self.len, &mut fresh, 0);
        }
        self.replace_memory(&mut fresh);

        Ok(())
    }

    /// Drops the elements past `len`. Capacity is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use av_vec::vector;
    ///
    /// let mut v = vector![1, 2, 3, 4];
    /// v.truncate(1);
    /// assert_eq!(v, [1]);
    /// assert_eq!(v.capacity(), 4);
    /// ```
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }

        let tail = ptr::slice_from_raw_parts_mut(self.memory.slot_mut(len), self.len - len);
        // Shrink first: a panicking destructor must not expose dropped slots.
        self.len = len;

        // SAFETY: `tail` held initialized elements that are no longer reachable.
        unsafe {
            ptr::drop_in_place(tail);
        }
    }

    /// Drops every element. Capacity is unchanged.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes to `len`, producing new elements with `f`.
    ///
    /// Shrinking drops the trailing elements and keeps the capacity. Growing
    /// reserves exactly `len` and appends. If `f` panics, the elements
    /// appended so far stay.
    #[track_caller]
    pub fn resize_with<F>(&mut self, len: usize, mut f: F)
    where
        F: FnMut() -> T,
    {
        unwrap_alloc(self.try_resize_with(len, || Ok(f())));
    }

    /// Fallible version of [`resize_with`](Self::resize_with).
    ///
    /// An allocation error leaves the vector unchanged. A constructor error
    /// keeps the elements appended before it.
    pub fn try_resize_with<E, F>(&mut self, len: usize, mut f: F) -> Result<(), InsertError<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        if len <= self.len {
            self.truncate(len);
            return Ok(());
        }

        self.try_reserve(len)?;

        while self.len < len {
            let value = f().map_err(InsertError::Construct)?;
            // SAFETY: reserved `len` above.
            unsafe { self.push_unchecked(value) };
        }

        Ok(())
    }
}

impl<T: Default> Vector<T> {
    /// Resizes to `len`, filling new slots with `T::default()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use av_vec::vector;
    ///
    /// let mut v = vector![7, 8];
    /// v.resize(4);
    /// assert_eq!(v, [7, 8, 0, 0]);
    ///
    /// v.resize(1);
    /// assert_eq!(v, [7]);
    /// assert_eq!(v.capacity(), 4);
    /// ```
    #[inline]
    #[track_caller]
    pub fn resize(&mut self, len: usize) {
        self.resize_with(len, T::default);
    }
}

// -----------------------------------------------------------------------------
// Relocation

impl<T> Vector<T> {
    /// Moves `range` of the live elements into `dst`, starting at `offset`.
    ///
    /// Relocation is a bitwise move that cannot fail, so elements are never
    /// cloned during growth. The source slots must be treated as raw
    /// afterwards.
    ///
    /// # Safety
    /// - `range` lies within `[0, len)`
    /// - `offset + range.len() <= dst.capacity()`
    /// - the target slots are uninitialized
    #[inline]
    pub(crate) unsafe fn relocate(
        &self,
        range: core::ops::Range<usize>,
        dst: &mut RawMemory<T>,
        offset: usize,
    ) {
        debug_assert!(range.end <= self.len);
        debug_assert!(offset + range.len() <= dst.capacity());

        unsafe {
            ptr::copy_nonoverlapping(self.memory.slot(range.start), dst.slot_mut(offset), range.len());
        }
    }

    /// Installs `fresh` as the block, leaving the old one in `fresh`.
    ///
    /// The caller must already have relocated every live element.
    #[inline]
    pub(crate) fn replace_memory(&mut self, fresh: &mut RawMemory<T>) {
        let old_capacity = self.capacity();
        self.memory.swap(fresh);

        log::trace!(
            "vector reallocated: capacity {old_capacity} -> {}, {} elements relocated",
            self.capacity(),
            self.len,
        );
    }
}

/// Capacity after a growth step: 1 for an empty vector, twice the length otherwise.
#[inline]
pub(crate) const fn grown_capacity(len: usize) -> Result<usize, AllocError> {
    if len == 0 {
        return Ok(1);
    }
    match len.checked_mul(2) {
        Some(capacity) => Ok(capacity),
        None => Err(AllocError::CapacityOverflow),
    }
}

/// Allocates a growth target, logging failures before they reach the caller.
#[inline]
pub(crate) fn allocate_logged<T>(capacity: usize) -> Result<RawMemory<T>, AllocError> {
    RawMemory::try_with_capacity(capacity).inspect_err(|err| {
        log::debug!("vector growth to {capacity} slots failed, contents kept: {err}");
    })
}

// -----------------------------------------------------------------------------
// Slice access

impl<T> Deref for Vector<T> {
    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for Vector<T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Vector, grown_capacity};
    use crate::testing::{DropCounter, Fragile, catch};
    use crate::{AllocError, InsertError, vector};
    use alloc::{vec, vec::Vec};
    use alloc::string::String;

    #[test]
    fn is_sync_send() {
        use core::panic::{RefUnwindSafe, UnwindSafe};

        fn is_send<T: Send>() {}
        fn is_sync<T: Sync>() {}
        fn is_unwindsafe<T: UnwindSafe>() {}
        fn is_refunwindsafe<T: RefUnwindSafe>() {}

        is_send::<Vector<i32>>();
        is_sync::<Vector<i32>>();
        is_unwindsafe::<Vector<i32>>();
        is_refunwindsafe::<Vector<i32>>();
    }

    #[test]
    fn new_is_empty_without_block() {
        let v = Vector::<String>::new();
        assert_eq!(v.len(), 0);
        assert_eq!(v.capacity(), 0);
        assert!(v.is_empty());
        assert!(v.iter().next().is_none());
    }

    #[test]
    fn sized_construction_uses_default() {
        let v = Vector::<String>::with_len(5);
        assert_eq!(v.len(), 5);
        assert!(v.capacity() >= 5);
        assert!(v.iter().all(String::is_empty));

        let v = Vector::<i32>::with_len(0);
        assert!(v.is_empty());
        assert_eq!(v.capacity(), 0);
    }

    #[test]
    fn sized_construction_rolls_back_on_panic() {
        let counter = DropCounter::new();
        let mut made = 0;

        let result = catch(|| {
            Vector::with_len_with(5, || {
                made += 1;
                if made == 4 {
                    panic!("constructor failed");
                }
                counter.track(made)
            })
        });

        assert!(result.is_err());
        assert_eq!(counter.drops(), 3);
    }

    #[test]
    fn sized_construction_rolls_back_on_error() {
        let counter = DropCounter::new();
        let mut made = 0;

        let result = Vector::try_with_len_with(5, || {
            made += 1;
            if made == 3 {
                return Err("bad element");
            }
            Ok(counter.track(made))
        });

        assert_eq!(result.unwrap_err(), InsertError::Construct("bad element"));
        assert_eq!(counter.drops(), 2);
    }

    #[test]
    fn take_from_steals_without_cloning() {
        let budget = Fragile::budget(0);
        let mut source: Vector<Fragile> = (0..3).map(|i| Fragile::new(i, &budget)).collect();
        let capacity = source.capacity();
        let ptr = source.as_ptr();

        let taken = Vector::take_from(&mut source);

        assert!(source.is_empty());
        assert_eq!(source.capacity(), 0);
        assert_eq!(taken.len(), 3);
        assert_eq!(taken.capacity(), capacity);
        assert_eq!(taken.as_ptr(), ptr);
        assert_eq!(taken.iter().map(Fragile::value).collect::<Vec<_>>(), [0, 1, 2]);
    }

    #[test]
    fn assign_take_swaps() {
        let mut a = vector![1, 2];
        let mut b = vector![3];

        a.assign_take(&mut b);

        assert_eq!(a, [3]);
        assert_eq!(b, [1, 2]);
    }

    #[test]
    fn reserve_keeps_addresses_when_large_enough() {
        let mut v = Vector::with_capacity(8);
        v.push_back(String::from("a"));
        v.push_back(String::from("b"));
        let ptr = v.as_ptr();

        v.reserve(8);
        v.reserve(3);
        v.reserve(0);

        assert_eq!(v.capacity(), 8);
        assert_eq!(v.as_ptr(), ptr);
    }

    #[test]
    fn reserve_relocates_without_dropping() {
        let counter = DropCounter::new();
        let mut v: Vector<_> = (0..3).map(|i| counter.track(i)).collect();

        v.reserve(100);

        assert_eq!(v.capacity(), 100);
        assert_eq!(counter.drops(), 0);
        assert_eq!(v.iter().map(|t| t.id).collect::<Vec<_>>(), [0, 1, 2]);

        drop(v);
        assert_eq!(counter.drops(), 3);
    }

    #[test]
    fn try_reserve_reports_overflow_and_keeps_contents() {
        let mut v = vector![1u64, 2, 3];
        let capacity = v.capacity();

        assert_eq!(v.try_reserve(usize::MAX), Err(AllocError::CapacityOverflow));
        assert_eq!(v, [1, 2, 3]);
        assert_eq!(v.capacity(), capacity);
    }

    #[test]
    fn resize_grows_with_default_and_shrinks_in_place() {
        let counter = DropCounter::new();
        let mut v: Vector<_> = (0..6).map(|i| counter.track(i)).collect();
        let capacity = v.capacity();

        v.resize_with(2, || unreachable!());
        assert_eq!(v.len(), 2);
        assert_eq!(v.capacity(), capacity);
        assert_eq!(counter.drops(), 4);

        let mut w = vector![1, 2];
        w.resize(5);
        assert_eq!(w, [1, 2, 0, 0, 0]);
        assert_eq!(w.capacity(), 5);
    }

    #[test]
    fn try_resize_keeps_prefix_on_error() {
        let mut v = vector![1, 2];
        let mut next = 2;

        let result = v.try_resize_with(6, || {
            next += 1;
            if next == 5 { Err("stop") } else { Ok(next) }
        });

        assert_eq!(result, Err(InsertError::Construct("stop")));
        assert_eq!(v, [1, 2, 3, 4]);
        assert_eq!(v.capacity(), 6);
    }

    #[test]
    fn truncate_and_clear() {
        let counter = DropCounter::new();
        let mut v: Vector<_> = (0..4).map(|i| counter.track(i)).collect();

        v.truncate(10);
        assert_eq!(v.len(), 4);

        v.truncate(3);
        assert_eq!(counter.drops(), 1);

        v.clear();
        assert!(v.is_empty());
        assert_eq!(counter.drops(), 4);
        assert_eq!(v.capacity(), 4);
    }

    #[test]
    fn unchecked_access() {
        let mut v = vector![5, 6, 7];
        unsafe {
            assert_eq!(*v.get_unchecked(2), 7);
            *v.get_unchecked_mut(0) = 50;
        }
        assert_eq!(v, [50, 6, 7]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "tried to index out-of-bounds of a vector")]
    fn unchecked_access_is_checked_in_debug() {
        let v = Vector::<i32>::with_capacity(4);
        let _ = unsafe { v.get_unchecked(0) };
    }

    #[test]
    fn growth_steps() {
        assert_eq!(grown_capacity(0), Ok(1));
        assert_eq!(grown_capacity(1), Ok(2));
        assert_eq!(grown_capacity(6), Ok(12));
        assert_eq!(grown_capacity(usize::MAX), Err(AllocError::CapacityOverflow));
    }

    #[test]
    fn zero_sized_elements() {
        let mut v = Vector::new();
        for _ in 0..10 {
            v.push_back(());
        }
        assert_eq!(v.len(), 10);
        assert!(v.capacity() >= 10);
        v.truncate(3);
        assert_eq!(v.as_slice(), vec![(); 3].as_slice());
    }
}
