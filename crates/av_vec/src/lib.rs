//! A contiguous, growable array built on [`av_raw::RawMemory`].
//!
//! [`Vector<T>`] pairs one raw block with a count of live elements. Slots
//! `[0, len)` are initialized, slots `[len, capacity)` are not. Every
//! operation that needs a bigger block allocates a new one, places the new
//! element there first, relocates the old elements and only then swaps the
//! blocks, so a failing allocation or constructor leaves the vector as it
//! was.
//!
//! ```
//! use av_vec::{Vector, vector};
//!
//! let mut v = vector![1, 2];
//! v.insert(1, 42);
//! assert_eq!(v, [1, 42, 2]);
//!
//! v.erase(0);
//! assert_eq!(v, [42, 2]);
//! assert_eq!(v.len(), 2);
//! ```
//!
//! Fallible entry points (`try_*`) report [`AllocError`] and constructor
//! failures through [`InsertError`] instead of aborting or panicking.
#![expect(unsafe_code, reason = "Containers construct values in raw memory.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

#[cfg(test)]
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod clone;
mod container;
mod error;
mod insert;
mod iter;
mod macros;
mod traits;

#[cfg(test)]
mod model;
#[cfg(test)]
mod testing;

// -----------------------------------------------------------------------------
// Top-level exports

pub use av_raw::AllocError;
pub use container::Vector;
pub use error::InsertError;
pub use iter::IntoIter;
