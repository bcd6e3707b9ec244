use core::alloc::Layout;

use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// The reason a raw block could not be acquired.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AllocError {
    /// The requested element count does not fit in `isize::MAX` bytes.
    #[error("capacity overflow: the requested block exceeds `isize::MAX` bytes")]
    CapacityOverflow,

    /// The global allocator returned null.
    #[error("memory allocation of {} bytes failed", .layout.size())]
    Exhausted { layout: Layout },
}

impl AllocError {
    /// Diverges for an allocation failure on an infallible path.
    ///
    /// Overflow panics, allocator exhaustion goes through
    /// [`handle_alloc_error`](alloc::alloc::handle_alloc_error).
    #[cold]
    #[inline(never)]
    #[track_caller]
    pub fn handle(self) -> ! {
        match self {
            AllocError::CapacityOverflow => panic!("capacity overflow"),
            AllocError::Exhausted { layout } => alloc::alloc::handle_alloc_error(layout),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::AllocError;
    use alloc::string::ToString;
    use core::alloc::Layout;

    #[test]
    fn messages() {
        assert_eq!(
            AllocError::CapacityOverflow.to_string(),
            "capacity overflow: the requested block exceeds `isize::MAX` bytes"
        );

        let layout = Layout::from_size_align(64, 8).unwrap();
        assert_eq!(
            AllocError::Exhausted { layout }.to_string(),
            "memory allocation of 64 bytes failed"
        );
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn handle_overflow_panics() {
        AllocError::CapacityOverflow.handle();
    }
}
