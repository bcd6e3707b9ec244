use crate::Vector;

// -----------------------------------------------------------------------------
// Copy construction

impl<T: Clone> Vector<T> {
    /// Creates a vector holding clones of `source`, with capacity exactly
    /// `source.len()`.
    ///
    /// If a `clone` panics, the clones made so far are dropped and the block
    /// is released.
    #[track_caller]
    pub fn from_slice(source: &[T]) -> Self {
        let mut vector = Self::with_capacity(source.len());
        for item in source {
            // SAFETY: sized to `source.len()`.
            unsafe { vector.push_unchecked(item.clone()) };
        }
        vector
    }

    /// Creates a vector of `len` copies of `elem`.
    ///
    /// `elem` itself fills the last slot, so only `len - 1` clones are made.
    #[track_caller]
    pub fn from_elem(elem: T, len: usize) -> Self {
        let mut vector = Self::with_capacity(len);
        if len == 0 {
            return vector;
        }
        for _ in 1..len {
            // SAFETY: sized to `len`.
            unsafe { vector.push_unchecked(elem.clone()) };
        }
        // SAFETY: one slot left.
        unsafe { vector.push_unchecked(elem) };
        vector
    }

    /// Replaces the contents with clones of `source`.
    ///
    /// If `source` does not fit, a complete copy is built first and swapped
    /// in, so a panicking `clone` leaves `self` untouched. Otherwise the
    /// current block is reused: surplus elements are dropped, the common
    /// prefix is assigned with [`Clone::clone_from`] and the rest is
    /// cloned into the free slots. A panic on that path leaves a valid vector
    /// holding whatever was assigned so far.
    ///
    /// # Examples
    ///
    /// ```
    /// use av_vec::{Vector, vector};
    ///
    /// let mut v = Vector::with_capacity(8);
    /// v.push_back(String::from("old"));
    /// let ptr = v.as_ptr();
    ///
    /// v.assign_cloned(&[String::from("a"), String::from("b")]);
    /// assert_eq!(v, ["a", "b"]);
    /// assert_eq!(v.as_ptr(), ptr);
    /// ```
    #[track_caller]
    pub fn assign_cloned(&mut self, source: &[T]) {
        if source.len() > self.capacity() {
            let mut copy = Self::from_slice(source);
            self.swap(&mut copy);
            return;
        }

        self.truncate(source.len());

        let (prefix, suffix) = source.split_at(self.len);
        for (dst, src) in self.as_mut_slice().iter_mut().zip(prefix) {
            dst.clone_from(src);
        }
        for item in suffix {
            // SAFETY: `source.len() <= capacity`.
            unsafe { self.push_unchecked(item.clone()) };
        }
    }
}

impl<T: Clone> Clone for Vector<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self::from_slice(self.as_slice())
    }

    #[inline]
    fn clone_from(&mut self, source: &Self) {
        self.assign_cloned(source.as_slice());
    }
}

// -----------------------------------------------------------------------------
// Tests
