//! Raw, uninitialized storage for the `av_vec` containers.
//!
//! **RawMemory**
//!
//! [`RawMemory<T>`] owns a heap block sized for a fixed number of `T`.
//! It knows its capacity, but nothing about which slots hold live values:
//! constructing and dropping elements is entirely the owner's job.
//!
//! Growth never resizes a block in place. A container that needs more room
//! allocates a fresh `RawMemory`, relocates its elements and then exchanges
//! the two blocks with [`RawMemory::swap`], which cannot fail.
//!
//! **AllocError**
//!
//! [`AllocError`] is returned by the fallible constructors. The infallible
//! ones route it through [`AllocError::handle`], which diverges the same way
//! the standard collections do.
#![expect(unsafe_code, reason = "Raw allocation is inherently unsafe.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

#[cfg(test)]
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod raw_memory;

// -----------------------------------------------------------------------------
// Top-level exports

pub use error::AllocError;
pub use raw_memory::RawMemory;
