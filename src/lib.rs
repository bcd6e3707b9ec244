//! Contiguous growable arrays over explicitly managed raw storage.
//!
//! - [`raw`]: the storage owner, an uninitialized block of fixed capacity.
//! - [`vec`]: the [`Vector`](vec::Vector) container built on top of it.
//!
//! ```
//! use av_core::vec::{Vector, vector};
//!
//! let mut v: Vector<i32> = vector![1, 2];
//! v.insert(1, 42);
//! assert_eq!(v, [1, 42, 2]);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use av_raw as raw;
pub use av_vec as vec;
