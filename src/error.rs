/// Unified error types for the OIDC identity cache
use crate::identity::ParseFailure;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the identity cache
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored claims for a subject could not be parsed
    #[error("{failure}: Error parsing stored idtoken for {sub}")]
    MalformedClaims { sub: String, failure: ParseFailure },

    /// Submitted token could not be parsed
    #[error("{0}: Error parsing idtoken")]
    InvalidToken(ParseFailure),

    /// Submitted token exceeds the stored column bound
    #[error("idtoken too large: {len} characters (max {max})")]
    ClaimsTooLarge { len: usize, max: usize },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Convert IdentityError to HTTP response
impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            IdentityError::InvalidToken(failure) => (
                StatusCode::BAD_REQUEST,
                failure.code().to_string(),
                self.to_string(),
            ),
            IdentityError::ClaimsTooLarge { .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PayloadTooLarge".to_string(),
                self.to_string(),
            ),
            IdentityError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "InvalidRequest".to_string(),
                self.to_string(),
            ),
            IdentityError::MalformedClaims { failure, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                failure.code().to_string(),
                self.to_string(),
            ),
            IdentityError::Database(_) | IdentityError::Internal(_) | IdentityError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalServerError".to_string(),
                "Internal server error".to_string(), // Don't leak details
            ),
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(ErrorResponse {
            error: error_code,
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for identity cache operations
pub type IdentityResult<T> = Result<T, IdentityError>;
