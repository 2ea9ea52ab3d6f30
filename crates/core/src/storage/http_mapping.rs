//! Pure functions for mapping domain errors to HTTP status codes.

use crate::task::TaskError;

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `AlreadyExists` -> 409 (Conflict)
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `QueryFailed`, `Serialization`, `InvalidData` -> 500 (Internal Server Error)
///
/// # Examples
///
/// ```
/// use tasktrack_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::task_not_found("abc-123");
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::InvalidData(_) => 500,
    }
}

/// Validation failures are always the client's fault.
pub fn task_error_to_status_code(_error: &TaskError) -> u16 {
    400
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let error = RepositoryError::task_not_found("task-123");
        assert_eq!(repository_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_already_exists_maps_to_409() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "Task",
            id: "task-456".to_string(),
        };
        assert_eq!(repository_error_to_status_code(&error), 409);
    }

    #[test]
    fn test_connection_failed_maps_to_503() {
        let error = RepositoryError::ConnectionFailed("database is locked".to_string());
        assert_eq!(repository_error_to_status_code(&error), 503);
    }

    #[test]
    fn test_store_failures_map_to_500() {
        for error in [
            RepositoryError::QueryFailed("syntax error".to_string()),
            RepositoryError::Serialization("bad json".to_string()),
            RepositoryError::InvalidData("unknown status".to_string()),
        ] {
            assert_eq!(repository_error_to_status_code(&error), 500);
        }
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(task_error_to_status_code(&TaskError::EmptyTitle), 400);
        assert_eq!(task_error_to_status_code(&TaskError::DueDateInPast), 400);
    }
}
