//! Redis cache backend implementation.
//!
//! Shares the task cache between instances. Built on the `redis` crate's
//! auto-reconnecting `ConnectionManager`.

mod cache;
mod error;

pub use cache::RedisCache;
