//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::keys::{KeyError, StoreError, ValidationError};

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Authentication Errors**: Rejected API keys or admin credentials
/// - **Validation Errors**: Key generation input the caller must correct
/// - **Request Errors**: Malformed bodies or parameters
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// API key is missing, malformed, unknown, revoked or expired.
    ///
    /// Returns HTTP 401 Unauthorized. The cause is never revealed.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Admin token is missing or wrong.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid admin credentials")]
    InvalidAdminToken,

    /// No key matches the plaintext presented for revocation.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("API key not found")]
    ApiKeyNotFound,

    /// Owner name or description rejected.
    ///
    /// Returns HTTP 400 Bad Request with the specific reason.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid request")]
    InvalidRequest(String),

    /// Server-side failure that is not a database error (hashing, entropy,
    /// key store outage).
    ///
    /// Returns HTTP 500; details are only logged.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<KeyError> for AppError {
    fn from(err: KeyError) -> Self {
        match err {
            KeyError::Validation(e) => AppError::Validation(e),
            KeyError::Invalid => AppError::InvalidApiKey,
            KeyError::Storage(StoreError::Database(e)) => AppError::Database(e),
            KeyError::Storage(e @ StoreError::Unavailable(_)) => AppError::Internal(e.to_string()),
            e @ (KeyError::Hashing(_) | KeyError::Entropy(_)) => AppError::Internal(e.to_string()),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidApiKey`, `InvalidAdminToken` → 401 Unauthorized
/// - `ApiKeyNotFound` → 404 Not Found
/// - `Validation`, `InvalidRequest` → 400 Bad Request
/// - `Database`, `Internal` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::InvalidApiKey => (
                StatusCode::UNAUTHORIZED,
                "invalid_api_key",
                self.to_string(),
            ),
            AppError::InvalidAdminToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_admin_token",
                self.to_string(),
            ),
            AppError::ApiKeyNotFound => {
                (StatusCode::NOT_FOUND, "api_key_not_found", self.to_string())
            }
            AppError::Validation(ref e) => {
                (StatusCode::BAD_REQUEST, "validation_error", e.to_string())
            }
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::Database(ref e) => {
                tracing::error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Internal(ref msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_errors_keep_their_category() {
        assert!(matches!(AppError::from(KeyError::Invalid), AppError::InvalidApiKey));
        assert!(matches!(
            AppError::from(KeyError::Validation(ValidationError::EmptyOwnerName)),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(KeyError::Storage(StoreError::Unavailable("down".into()))),
            AppError::Internal(_)
        ));
        assert!(matches!(
            AppError::from(KeyError::Storage(StoreError::Database(sqlx::Error::PoolTimedOut))),
            AppError::Database(_)
        ));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::InvalidApiKey.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Validation(ValidationError::OwnerNameCharset)
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database(sqlx::Error::PoolTimedOut)
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
