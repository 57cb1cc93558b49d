//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::AuthError;
use crate::domain::DomainError;
use crate::store::StoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // 401
    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    // 400
    #[error(transparent)]
    Validation(#[from] DomainError),

    // 405
    #[error("Method not allowed")]
    MethodNotAllowed,

    // 500, store text is surfaced to the caller
    #[error(transparent)]
    Store(#[from] StoreError),

    // 500, details stay in the logs
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, error_code) = match &self {
            AppError::Unauthorized(auth_err) => (self.to_string(), auth_err.code()),
            AppError::Validation(domain_err) => (self.to_string(), domain_err.code()),
            AppError::MethodNotAllowed => (self.to_string(), "method_not_allowed"),
            AppError::Store(e) => {
                tracing::error!(retryable = e.is_retryable(), "Store error: {:?}", e);
                (self.to_string(), "store_error")
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal server error".to_string(), "internal_error")
            }
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: AppError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_401() {
        let (status, body) = body_of(AppError::from(AuthError::MissingCredential)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error_code, "missing_credential");
    }

    #[tokio::test]
    async fn test_validation_maps_to_400() {
        let (status, body) = body_of(AppError::from(DomainError::InvalidExpenseCategories)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error_code, "invalid_expense_categories");
        assert!(body.error.contains("must be an array"));
    }

    #[tokio::test]
    async fn test_store_error_surfaces_text() {
        let err = AppError::from(StoreError::Unavailable("relation does not exist".to_string()));
        let (status, body) = body_of(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error_code, "store_error");
        assert!(body.error.contains("relation does not exist"));
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let (status, body) = body_of(AppError::Internal("stack trace here".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal server error");
        assert!(!body.error.contains("stack trace"));
    }

    #[test]
    fn test_method_not_allowed_status() {
        assert_eq!(AppError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
