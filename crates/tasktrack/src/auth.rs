//! Bearer token authentication.
//!
//! Tokens are HS256 JWTs signed with `JWT_SECRET`. Issuing them is somebody
//! else's job; this module only validates.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT claims carried by API tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub user_id: i64,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingAuthHeader,
    #[error("Invalid authorization header format")]
    InvalidAuthFormat,
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Rejected request");
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Validates bearer tokens against a shared secret.
#[derive(Clone)]
pub struct JwtAuth {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuth {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }

    fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?;

        header
            .to_str()
            .map_err(|_| AuthError::InvalidAuthFormat)?
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::InvalidAuthFormat)
    }
}

/// Extractor for an authenticated caller. Rejects with 401.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
}

impl<S> FromRequestParts<S> for AuthUser
where
    JwtAuth: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = JwtAuth::from_ref(state);
        let token = JwtAuth::bearer_token(parts)?;
        let claims = auth.validate(token)?;

        tracing::trace!(user_id = claims.user_id, "Authenticated request");
        Ok(AuthUser {
            user_id: claims.user_id,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    const SECRET: &str = "test-secret";

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/tasks");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    async fn extract(header: Option<&str>) -> Result<AuthUser, AuthError> {
        let auth = JwtAuth::new(SECRET);
        let mut parts = parts_with(header);
        AuthUser::from_request_parts(&mut parts, &auth).await
    }

    #[tokio::test]
    async fn test_valid_token() {
        let token = test_tokens::sign(SECRET, 7, 3600);

        let user = extract(Some(&format!("Bearer {token}"))).await.unwrap();

        assert_eq!(user.user_id, 7);
    }

    #[tokio::test]
    async fn test_missing_header() {
        let err = extract(None).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingAuthHeader));
    }

    #[tokio::test]
    async fn test_wrong_scheme() {
        let token = test_tokens::sign(SECRET, 7, 3600);
        let err = extract(Some(&format!("Basic {token}"))).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidAuthFormat));
    }

    #[tokio::test]
    async fn test_empty_bearer() {
        let err = extract(Some("Bearer ")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidAuthFormat));
    }

    #[tokio::test]
    async fn test_wrong_secret() {
        let token = test_tokens::sign("another-secret", 7, 3600);
        let err = extract(Some(&format!("Bearer {token}"))).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_expired_token() {
        let token = test_tokens::sign(SECRET, 7, -3600);
        let err = extract(Some(&format!("Bearer {token}"))).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_garbage_token() {
        let err = extract(Some("Bearer not.a.jwt")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_rejection_is_unauthorized() {
        let response = AuthError::MissingAuthHeader.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
