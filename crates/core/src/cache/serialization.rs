//! Pure functions for serializing tasks to and from cache bytes.
//!
//! Cache payloads are JSON so a value sitting in Redis can be inspected with
//! `redis-cli GET task:<id>`.

use thiserror::Error;

use crate::task::Task;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes a task to JSON bytes.
pub fn serialize_task(task: &Task) -> Result<Vec<u8>> {
    serde_json::to_vec(task).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a task.
///
/// Truncated, corrupted or foreign payloads all surface as
/// `DeserializeFailed`; callers treat that as a cache miss.
pub fn deserialize_task(bytes: &[u8]) -> Result<Task> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
