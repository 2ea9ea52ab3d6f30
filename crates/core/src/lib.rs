//! Functional core for tasktrack.
//!
//! Domain types, validation rules, and the repository/cache contracts shared
//! by every storage and cache backend. Nothing in this crate performs I/O.

pub mod cache;
pub mod serde;
pub mod storage;
pub mod task;
