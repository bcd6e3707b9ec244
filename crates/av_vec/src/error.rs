use core::convert::Infallible;

use av_raw::AllocError;
use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// Failure of a fallible insertion or construction.
///
/// Whatever the variant, the vector is left as it was before the call.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InsertError<E> {
    /// No block could be acquired for the grown vector.
    #[error(transparent)]
    Alloc(#[from] AllocError),

    /// The element constructor returned an error.
    #[error("element construction failed: {0}")]
    Construct(E),
}

impl<E> InsertError<E> {
    /// Returns the constructor error, if that is what failed.
    #[inline]
    pub fn into_construct(self) -> Option<E> {
        match self {
            InsertError::Construct(err) => Some(err),
            InsertError::Alloc(_) => None,
        }
    }
}

impl InsertError<Infallible> {
    /// The allocation error behind an insertion that cannot fail otherwise.
    #[inline]
    pub fn into_alloc(self) -> AllocError {
        match self {
            InsertError::Alloc(err) => err,
            InsertError::Construct(never) => match never {},
        }
    }
}

/// Unwraps the result of an infallible constructor, diverging on allocation failure.
#[inline]
#[track_caller]
pub(crate) fn unwrap_alloc<R>(result: Result<R, InsertError<Infallible>>) -> R {
    match result {
        Ok(value) => value,
        Err(err) => err.into_alloc().handle(),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::InsertError;
    use alloc::string::ToString;
    use av_raw::AllocError;

    #[test]
    fn messages() {
        let err: InsertError<&str> = AllocError::CapacityOverflow.into();
        assert_eq!(err.to_string(), AllocError::CapacityOverflow.to_string());
        assert_eq!(err.into_construct(), None);

        let err = InsertError::Construct("bad input");
        assert_eq!(err.to_string(), "element construction failed: bad input");
        assert_eq!(err.into_construct(), Some("bad input"));
    }
}
