use alloc::alloc as malloc;
use core::alloc::Layout;
use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::panic::{RefUnwindSafe, UnwindSafe};
use core::ptr::NonNull;

use crate::AllocError;

// -----------------------------------------------------------------------------
// RawMemory

/// An owned block of uninitialized memory for `capacity` values of `T`.
///
/// `RawMemory` never reads, writes or drops a `T`. Dropping it only returns
/// the block to the allocator, so the owner must drop every live element
/// first (or relocate them elsewhere).
///
/// The capacity is fixed for the lifetime of an instance.
///
/// # Examples
///
/// ```
/// use av_raw::RawMemory;
///
/// let mut memory = RawMemory::<u32>::with_capacity(4);
/// assert_eq!(memory.capacity(), 4);
///
/// unsafe {
///     memory.slot_mut(0).write(7);
///     assert_eq!(*memory.get(0), 7);
/// }
///
/// let mut empty = RawMemory::new();
/// memory.swap(&mut empty);
/// assert_eq!(memory.capacity(), 0);
/// assert_eq!(empty.capacity(), 4);
/// ```
pub struct RawMemory<T> {
    buffer: NonNull<T>,
    capacity: usize,
    _marker: PhantomData<T>,
}

unsafe impl<T: Send> Send for RawMemory<T> {}
unsafe impl<T: Sync> Sync for RawMemory<T> {}
impl<T: UnwindSafe> UnwindSafe for RawMemory<T> {}
impl<T: RefUnwindSafe> RefUnwindSafe for RawMemory<T> {}

impl<T> Drop for RawMemory<T> {
    fn drop(&mut self) {
        // SAFETY: `block` and `capacity` come from `allocate`.
        unsafe {
            Self::deallocate(self.block(), self.capacity);
        }
    }
}

impl<T> Default for RawMemory<T> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RawMemory<T> {
    const IS_ZST: bool = size_of::<T>() == 0;

    /// Creates an empty `RawMemory` without allocating.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            buffer: NonNull::dangling(),
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Allocates a block for `capacity` values.
    ///
    /// Panics on capacity overflow and aborts through
    /// [`handle_alloc_error`](alloc::alloc::handle_alloc_error)
    /// if the allocator fails.
    #[inline]
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(memory) => memory,
            Err(err) => err.handle(),
        }
    }

    /// Allocates a block for `capacity` values, reporting failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use av_raw::{AllocError, RawMemory};
    ///
    /// assert!(RawMemory::<u64>::try_with_capacity(16).is_ok());
    /// assert_eq!(
    ///     RawMemory::<u64>::try_with_capacity(usize::MAX).unwrap_err(),
    ///     AllocError::CapacityOverflow,
    /// );
    /// ```
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        let buffer = Self::allocate(capacity)?.unwrap_or(NonNull::dangling());

        Ok(Self {
            buffer,
            capacity,
            _marker: PhantomData,
        })
    }

    /// Allocates an uninitialized block for `n` values.
    ///
    /// Returns `Ok(None)` for `n == 0`. Zero-sized types never touch the
    /// allocator and get a dangling, well-aligned pointer.
    pub fn allocate(n: usize) -> Result<Option<NonNull<T>>, AllocError> {
        if n == 0 {
            return Ok(None);
        }
        if Self::IS_ZST {
            return Ok(Some(NonNull::dangling()));
        }

        let layout = array_layout::<T>(n)?;

        // SAFETY: `n != 0` and `T` is not a ZST, so the layout is non-zero.
        let ptr = unsafe { malloc::alloc(layout) };

        match NonNull::new(ptr) {
            Some(ptr) => Ok(Some(ptr.cast())),
            None => Err(AllocError::Exhausted { layout }),
        }
    }

    /// Releases a block returned by [`allocate`](Self::allocate).
    ///
    /// `None` and zero-sized blocks are ignored. No destructor is run.
    ///
    /// # Safety
    /// - `block` must come from `allocate(n)` with the same `n`
    /// - `block` must not be used afterwards
    pub unsafe fn deallocate(block: Option<NonNull<T>>, n: usize) {
        let Some(ptr) = block else {
            return;
        };
        if n != 0 && !Self::IS_ZST {
            unsafe {
                let layout = array_layout_unchecked::<T>(n);
                malloc::dealloc(ptr.as_ptr().cast(), layout);
            }
        }
    }

    /// Returns the number of values the block can hold.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the block, or `None` if nothing was requested.
    #[inline]
    pub const fn block(&self) -> Option<NonNull<T>> {
        if self.capacity == 0 {
            None
        } else {
            Some(self.buffer)
        }
    }

    /// Returns the start of the block.
    ///
    /// Dangling (but aligned) when the capacity is zero.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *const T {
        self.buffer.as_ptr()
    }

    /// Returns the start of the block.
    ///
    /// Dangling (but aligned) when the capacity is zero.
    #[inline(always)]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.buffer.as_ptr()
    }

    /// Returns the address of slot `offset`.
    ///
    /// The one-past-the-end address (`offset == capacity`) is allowed.
    #[inline]
    #[cfg_attr(any(feature = "debug", debug_assertions), track_caller)]
    pub fn slot(&self, offset: usize) -> *const T {
        #[cfg(any(feature = "debug", debug_assertions))]
        assert!(offset <= self.capacity, "slot offset out of bounds");

        self.buffer.as_ptr().wrapping_add(offset)
    }

    /// Returns the mutable address of slot `offset`.
    ///
    /// The one-past-the-end address (`offset == capacity`) is allowed.
    #[inline]
    #[cfg_attr(any(feature = "debug", debug_assertions), track_caller)]
    pub fn slot_mut(&mut self, offset: usize) -> *mut T {
        #[cfg(any(feature = "debug", debug_assertions))]
        assert!(offset <= self.capacity, "slot offset out of bounds");

        self.buffer.as_ptr().wrapping_add(offset)
    }

    /// Returns a reference to the value in slot `index`.
    ///
    /// # Safety
    /// - `index < capacity`
    /// - The slot must be initialized
    #[inline]
    #[cfg_attr(any(feature = "debug", debug_assertions), track_caller)]
    pub unsafe fn get(&self, index: usize) -> &T {
        #[cfg(any(feature = "debug", debug_assertions))]
        assert!(index < self.capacity, "tried to index out-of-bounds of a block");

        unsafe { &*self.buffer.as_ptr().add(index) }
    }

    /// Returns a mutable reference to the value in slot `index`.
    ///
    /// # Safety
    /// - `index < capacity`
    /// - The slot must be initialized
    #[inline]
    #[cfg_attr(any(feature = "debug", debug_assertions), track_caller)]
    pub unsafe fn get_mut(&mut self, index: usize) -> &mut T {
        #[cfg(any(feature = "debug", debug_assertions))]
        assert!(index < self.capacity, "tried to index out-of-bounds of a block");

        unsafe { &mut *self.buffer.as_ptr().add(index) }
    }

    /// Exchanges the blocks (and capacities) of `self` and `other`.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.buffer, &mut other.buffer);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }
}

impl<T> fmt::Debug for RawMemory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawMemory")
            .field("buffer", &self.buffer)
            .field("capacity", &self.capacity)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// alloc helper

/// Creates a layout for an array with `n` elements, checking for overflow.
#[inline]
const fn array_layout<T>(n: usize) -> Result<Layout, AllocError> {
    let Some(alloc_size) = size_of::<T>().checked_mul(n) else {
        return Err(AllocError::CapacityOverflow);
    };

    if alloc_size > isize::MAX as usize {
        return Err(AllocError::CapacityOverflow);
    }

    // SAFETY: `align_of` is a power of two and `alloc_size` is a multiple of it.
    Ok(unsafe { Layout::from_size_align_unchecked(alloc_size, align_of::<T>()) })
}

/// Creates a layout for an array with `n` elements without checking.
///
/// # Safety
/// - `size_of::<T>() * n` must not overflow
/// - The resulting size must be <= `isize::MAX`
#[inline]
const unsafe fn array_layout_unchecked<T>(n: usize) -> Layout {
    unsafe { Layout::from_size_align_unchecked(size_of::<T>() * n, align_of::<T>()) }
}

// -----------------------------------------------------------------------------
// Tests
