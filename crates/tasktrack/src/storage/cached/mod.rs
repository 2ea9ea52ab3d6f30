//! Cached repository decorator.
//!
//! Wraps a `TaskRepository` with the cache-aside pattern:
//!
//! - **Reads**: Check cache first, on miss fetch from repository and populate cache
//! - **Writes**: Persist to repository, then invalidate the cached snapshot
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let store = Arc::new(SqliteTaskStore::new("tasktrack.db").await?);
//! let cache = Arc::new(MemoryCache::new(10_000));
//!
//! let cached_repo = CachedTaskRepository::new(store, cache, Duration::from_secs(3600));
//! ```

mod task;

pub use task::{CachedTaskRepository, DEFAULT_CACHE_OP_TIMEOUT};
