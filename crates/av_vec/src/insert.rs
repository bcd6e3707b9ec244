use core::convert::Infallible;
use core::ptr;

use av_raw::AllocError;

use crate::container::{allocate_logged, grown_capacity};
use crate::error::unwrap_alloc;
use crate::{InsertError, Vector};

// -----------------------------------------------------------------------------
// Bounds

#[cold]
#[inline(never)]
#[track_caller]
fn insert_index_len_fail(index: usize, len: usize) -> ! {
    panic!("insertion index (is {index}) should be <= len (is {len})");
}

#[cold]
#[inline(never)]
#[track_caller]
fn remove_index_len_fail(index: usize, len: usize) -> ! {
    panic!("removal index (is {index}) should be < len (is {len})");
}

// -----------------------------------------------------------------------------
// Emplace

impl<T> Vector<T> {
    /// Constructs an element at `index` from a fallible constructor.
    ///
    /// Elements in `[index, len)` shift one slot to the right. Returns the
    /// index of the new element.
    ///
    /// When the block is full, a block of twice the length (1 if empty) is
    /// allocated and the new element is placed there before the old elements
    /// are relocated around it. An allocation or constructor error therefore
    /// leaves the vector unchanged, as does a panic in `f`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, before anything is constructed.
    ///
    /// # Examples
    ///
    /// ```
    /// use av_vec::{InsertError, vector};
    ///
    /// let mut v = vector![1, 3];
    /// assert_eq!(v.try_emplace_with(1, || Ok::<_, &str>(2)), Ok(1));
    /// assert_eq!(v, [1, 2, 3]);
    ///
    /// let err = v.try_emplace_with(0, || Err("rejected"));
    /// assert_eq!(err, Err(InsertError::Construct("rejected")));
    /// assert_eq!(v, [1, 2, 3]);
    /// ```
    #[track_caller]
    pub fn try_emplace_with<E, F>(&mut self, index: usize, f: F) -> Result<usize, InsertError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let len = self.len;
        if index > len {
            insert_index_len_fail(index, len);
        }

        if len < self.capacity() {
            // The temporary is built before any slot is touched.
            let value = f().map_err(InsertError::Construct)?;
            // SAFETY: `index <= len < capacity`.
            unsafe { self.insert_in_place(index, value) };
        } else {
            let mut fresh = allocate_logged(grown_capacity(len)?)?;
            let value = f().map_err(InsertError::Construct)?;

            // SAFETY: `fresh` holds `len + 1` slots and is disjoint from `memory`.
            // The new element goes in first, then prefix and suffix around it.
            unsafe {
                ptr::write(fresh.slot_mut(index), value);
                self.relocate(0..index, &mut fresh, 0);
                self.relocate(index..len, &mut fresh, index + 1);
            }
            self.replace_memory(&mut fresh);
        }

        self.len = len + 1;
        Ok(index)
    }

    /// Constructs an element at `index` with `f`, shifting the tail right.
    ///
    /// Returns the index of the new element. If `f` panics the vector is
    /// unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[inline]
    #[track_caller]
    pub fn emplace_with<F>(&mut self, index: usize, f: F) -> usize
    where
        F: FnOnce() -> T,
    {
        unwrap_alloc(self.try_emplace_with(index, || Ok(f())))
    }

    /// Constructs an element at the end and returns a reference to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use av_vec::Vector;
    ///
    /// let mut v = Vector::new();
    /// let last = v.emplace_back_with(|| String::from("tail"));
    /// last.push('!');
    /// assert_eq!(v[0], "tail!");
    /// ```
    #[inline]
    #[track_caller]
    pub fn emplace_back_with<F>(&mut self, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        let index = self.emplace_with(self.len, f);
        // SAFETY: just constructed.
        unsafe { self.get_unchecked_mut(index) }
    }

    /// Fallible version of [`emplace_back_with`](Self::emplace_back_with).
    #[inline]
    pub fn try_emplace_back_with<E, F>(&mut self, f: F) -> Result<&mut T, InsertError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let index = self.try_emplace_with(self.len, f)?;
        // SAFETY: just constructed.
        Ok(unsafe { self.get_unchecked_mut(index) })
    }

    /// Places `value` at `index` in a block with a free slot.
    ///
    /// The current last element moves into the free slot, the rest of the
    /// tail shifts right, and `value` fills the hole. Does not update `len`.
    ///
    /// # Safety
    /// `index <= len < capacity`.
    #[inline]
    unsafe fn insert_in_place(&mut self, index: usize, value: T) {
        let len = self.len;
        debug_assert!(index <= len && len < self.capacity());

        unsafe {
            let base = self.memory.as_mut_ptr();
            if index < len {
                ptr::copy_nonoverlapping(base.add(len - 1), base.add(len), 1);
                ptr::copy(base.add(index), base.add(index + 1), len - 1 - index);
            }
            ptr::write(base.add(index), value);
        }
    }
}

// -----------------------------------------------------------------------------
// Insert

impl<T> Vector<T> {
    /// Inserts `value` at `index`, shifting the tail right.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use av_vec::vector;
    ///
    /// let mut v = vector![1, 2];
    /// let at = v.insert(1, 42);
    /// assert_eq!(at, 1);
    /// assert_eq!(v, [1, 42, 2]);
    /// ```
    #[inline]
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: T) -> usize {
        self.emplace_with(index, move || value)
    }

    /// Fallible version of [`insert`](Self::insert).
    ///
    /// On allocation failure `value` is dropped and the vector is unchanged.
    #[inline]
    #[track_caller]
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<usize, AllocError> {
        self.try_emplace_with(index, move || Ok::<T, Infallible>(value))
            .map_err(InsertError::into_alloc)
    }

    /// Appends `value`, doubling the capacity when full.
    ///
    /// # Examples
    ///
    /// ```
    /// use av_vec::Vector;
    ///
    /// let mut v = Vector::new();
    /// for i in 0..5 {
    ///     v.push_back(i);
    /// }
    /// assert_eq!(v, [0, 1, 2, 3, 4]);
    /// assert_eq!(v.capacity(), 8);
    /// ```
    #[inline]
    #[track_caller]
    pub fn push_back(&mut self, value: T) {
        if self.len < self.capacity() {
            // SAFETY: checked above.
            unsafe { self.push_unchecked(value) };
        } else {
            self.emplace_with(self.len, move || value);
        }
    }

    /// Fallible version of [`push_back`](Self::push_back).
    ///
    /// On allocation failure `value` is dropped and the vector is unchanged.
    #[inline]
    pub fn try_push_back(&mut self, value: T) -> Result<(), AllocError> {
        self.try_emplace_with(self.len, move || Ok::<T, Infallible>(value))
            .map(|_| ())
            .map_err(InsertError::into_alloc)
    }
}

impl<T: Clone> Vector<T> {
    /// Appends a clone of `value`.
    ///
    /// The clone is made before the vector is touched, so a panicking
    /// `clone` leaves it unchanged even when the push would reallocate.
    #[inline]
    #[track_caller]
    pub fn push_back_cloned(&mut self, value: &T) {
        self.emplace_with(self.len, || value.clone());
    }

    /// Inserts a clone of `value` at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[inline]
    #[track_caller]
    pub fn insert_cloned(&mut self, index: usize, value: &T) -> usize {
        self.emplace_with(index, || value.clone())
    }
}

// -----------------------------------------------------------------------------
// Remove

impl<T> Vector<T> {
    /// Removes and returns the last element, or `None` if empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot was initialized and is no longer counted as live.
        Some(unsafe { ptr::read(self.memory.slot(self.len)) })
    }

    /// Drops the last element.
    ///
    /// Calling this on an empty vector is a logic error, caught by an
    /// assertion in debug builds and ignored otherwise.
    #[inline]
    #[cfg_attr(any(feature = "debug", debug_assertions), track_caller)]
    pub fn pop_back(&mut self) {
        #[cfg(any(feature = "debug", debug_assertions))]
        assert!(self.len > 0, "pop_back on an empty vector");

        drop(self.pop());
    }

    /// Removes and returns the element at `index`, shifting the tail left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.len;
        if index >= len {
            remove_index_len_fail(index, len);
        }

        // SAFETY: `index < len`; the hole is closed before `len` shrinks.
        unsafe {
            let base = self.memory.as_mut_ptr();
            let removed = ptr::read(base.add(index));
            ptr::copy(base.add(index + 1), base.add(index), len - index - 1);
            self.len = len - 1;
            removed
        }
    }

    /// Drops the element at `index`, shifting the tail left.
    ///
    /// Returns `index`, which now refers to the element that followed the
    /// erased one (or `len` if it was the last). The removed element is
    /// dropped after the vector is consistent again.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use av_vec::vector;
    ///
    /// let mut v = vector![1, 42, 2];
    /// assert_eq!(v.erase(0), 0);
    /// assert_eq!(v, [42, 2]);
    /// ```
    #[inline]
    #[track_caller]
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }
}

// -----------------------------------------------------------------------------
// Tests
