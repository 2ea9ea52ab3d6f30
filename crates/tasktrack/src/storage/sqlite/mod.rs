//! SQLite storage backend implementation.
//!
//! Uses `rusqlite` for the synchronous driver and `tokio-rusqlite` to run it
//! on a dedicated thread behind an async handle.

mod conversions;
mod error;
mod functions;
mod repository;
mod schema;

pub use repository::SqliteTaskStore;
