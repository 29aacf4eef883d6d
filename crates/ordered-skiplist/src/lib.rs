#![cfg_attr(test, allow(unused_crate_dependencies, reason = "`proptest` is only used by some tests"))]

//! A probabilistic ordered set backed by a [skiplist].
//!
//! Entries are kept unique and sorted according to a [`Comparator`]. Insertion, lookup, and
//! erasure take expected `O(log n)` time; indexed access ([`Skiplist::get_index`]) walks the
//! bottom level and is `O(n)`.
//!
//! Entries are referred to by [`Position`]s, which stay valid until their entry is erased.
//! Erasing an entry makes its `Position` stale, and stale positions are rejected rather than
//! silently reused.
//!
//! [skiplist]: https://en.wikipedia.org/wiki/Skip_list

mod config;
mod error;
mod interface;
mod iter;
mod levels;
mod list;


pub use self::{
    config::SkiplistConfig,
    error::{Result, SkiplistError},
    interface::{Comparator, OrdComparator},
    iter::{Cursor, IntoIter, Iter},
    levels::{DEFAULT_LEVEL_PROBABILITY, DEFAULT_MAX_LEVEL, LEVEL_CAP},
    list::{Position, Skiplist},
};
