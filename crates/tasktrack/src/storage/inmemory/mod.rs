//! In-memory storage backend for testing.
//!
//! This module provides an in-memory implementation of `TaskRepository`
//! that stores all data in a HashMap wrapped in `Arc<RwLock<_>>`. It is the
//! substitutable fake store for tests and for running without a database.
//!
//! # Example
//!
//! ```rust,ignore
//! use tasktrack::storage::inmemory::InMemoryTaskStore;
//!
//! let store = InMemoryTaskStore::new();
//! // Use store for testing...
//! ```

mod repository;

pub use repository::InMemoryTaskStore;
