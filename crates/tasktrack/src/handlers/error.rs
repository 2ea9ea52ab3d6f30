use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tasktrack_core::storage::{
    repository_error_to_status_code, task_error_to_status_code, RepositoryError,
};
use tasktrack_core::task::TaskError;

use crate::service::ServiceError;

/// A request the handler could not even parse.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct BadRequest(pub String);

pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        let code = if let Some(err) = self.0.downcast_ref::<ServiceError>() {
            match err {
                ServiceError::Validation(e) => task_error_to_status_code(e),
                ServiceError::Repository(e) => repository_error_to_status_code(e),
            }
        } else if let Some(err) = self.0.downcast_ref::<RepositoryError>() {
            repository_error_to_status_code(err)
        } else if let Some(err) = self.0.downcast_ref::<TaskError>() {
            task_error_to_status_code(err)
        } else if self.0.is::<BadRequest>() {
            400
        } else {
            500
        };

        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.0.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %message, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %message, "Request rejected");
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: impl Into<AppError>) -> (StatusCode, serde_json::Value) {
        let response = err.into().into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_validation_is_bad_request() {
        let (status, body) = render(ServiceError::Validation(TaskError::EmptyTitle)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Task title cannot be empty");
    }

    #[tokio::test]
    async fn test_not_found() {
        let err = ServiceError::Repository(RepositoryError::task_not_found("abc"));
        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Task not found: abc");
    }

    #[tokio::test]
    async fn test_connection_failure_is_unavailable() {
        let err = ServiceError::Repository(RepositoryError::ConnectionFailed("closed".into()));
        let (status, _) = render(err).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_query_failure_is_internal() {
        let (status, _) = render(RepositoryError::QueryFailed("syntax".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_bad_request_and_unknown_errors() {
        let (status, body) = render(BadRequest("Invalid task id".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid task id");

        let (status, _) = render(anyhow::anyhow!("boom")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
