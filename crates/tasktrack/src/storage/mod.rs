//! Storage backend implementations.
//!
//! This module provides concrete implementations of the `TaskRepository`
//! trait defined in `tasktrack_core::storage`. The backend is selected at
//! compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//! - `inmemory`: HashMap-backed store, data is lost on exit
//!
//! These features are mutually exclusive - only one storage backend can be
//! enabled at a time. The in-memory store is always compiled for tests.
//!
//! # Examples
//!
//! Build with SQLite (default):
//! ```bash
//! cargo build -p tasktrack
//! ```
//!
//! Build with the in-memory store:
//! ```bash
//! cargo build -p tasktrack --no-default-features --features inmemory,memory
//! ```

// Compile-time checks for mutual exclusivity
#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!(
    "Features 'sqlite' and 'inmemory' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "sqlite", feature = "inmemory")))]
compile_error!(
    "No storage backend selected. Enable 'sqlite' or 'inmemory' feature. \
    Example: cargo build -p tasktrack --features sqlite"
);

pub mod cached;

#[cfg(any(test, feature = "inmemory"))]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use cached::CachedTaskRepository;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryTaskStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteTaskStore;
