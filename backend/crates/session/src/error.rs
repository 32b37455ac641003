//! Session Error Types
//!
//! This module provides session-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Session-specific result type alias
pub type SessionResult<T> = Result<T, SessionError>;

/// Session-specific error variants
#[derive(Debug, Error)]
pub enum SessionError {
    /// Unknown identifier or wrong secret (deliberately indistinguishable)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Token validity window elapsed
    #[error("Token expired")]
    ExpiredToken,

    /// Token is structurally invalid or its signature does not match
    #[error("Token malformed")]
    MalformedToken,

    /// Access token presented where a refresh token is expected, or vice versa
    #[error("Wrong token kind")]
    WrongKind,

    /// No bearer token on a protected route
    #[error("Missing bearer token")]
    MissingToken,

    /// Request body could not be parsed
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SessionError {
    /// Machine-readable tag for client-side branching
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::InvalidCredentials => "InvalidCredentials",
            SessionError::ExpiredToken => "ExpiredToken",
            SessionError::MalformedToken => "MalformedToken",
            SessionError::WrongKind => "WrongKind",
            SessionError::MissingToken => "MissingToken",
            SessionError::MalformedRequest(_) => "MalformedRequest",
            SessionError::Database(_) | SessionError::Internal(_) => "InternalError",
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::InvalidCredentials
            | SessionError::ExpiredToken
            | SessionError::MalformedToken
            | SessionError::WrongKind
            | SessionError::MissingToken => ErrorKind::Unauthorized,
            SessionError::MalformedRequest(_) => ErrorKind::BadRequest,
            SessionError::Database(_) | SessionError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Whether this is one of the token verification failures
    pub fn is_token_failure(&self) -> bool {
        matches!(
            self,
            SessionError::ExpiredToken | SessionError::MalformedToken | SessionError::WrongKind
        )
    }

    /// Human-facing message; never carries internal detail
    fn public_message(&self) -> String {
        match self {
            SessionError::InvalidCredentials => "Invalid identifier or secret".to_string(),
            SessionError::ExpiredToken
            | SessionError::MalformedToken
            | SessionError::WrongKind
            | SessionError::MissingToken => {
                "Your session is no longer valid. Please sign in again.".to_string()
            }
            SessionError::MalformedRequest(detail) => detail.clone(),
            SessionError::Database(_) | SessionError::Internal(_) => {
                "An unexpected error occurred".to_string()
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.public_message()).with_code(self.code())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            SessionError::Database(e) => {
                tracing::error!(error = %e, "Session database error");
            }
            SessionError::Internal(msg) => {
                tracing::error!(message = %msg, "Session internal error");
            }
            SessionError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            SessionError::MalformedToken => {
                tracing::warn!("Malformed or forged token presented");
            }
            _ => {
                tracing::debug!(error = %self, "Session error");
            }
        }
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for SessionError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        SessionError::MalformedRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_failures_are_unauthorized() {
        for err in [
            SessionError::ExpiredToken,
            SessionError::MalformedToken,
            SessionError::WrongKind,
        ] {
            assert!(err.is_token_failure());
            assert_eq!(err.kind(), ErrorKind::Unauthorized);
            assert_eq!(err.to_app_error().code(), err.code());
        }
    }

    #[test]
    fn test_internal_errors_are_opaque() {
        let err = SessionError::Internal("argon2 exploded at 0xdeadbeef".to_string());
        let app = err.to_app_error();
        assert_eq!(app.status_code(), 500);
        assert_eq!(app.code(), "InternalError");
        assert!(!app.message().contains("deadbeef"));
    }

    #[test]
    fn test_credential_message_is_generic() {
        let app = SessionError::InvalidCredentials.to_app_error();
        assert_eq!(app.code(), "InvalidCredentials");
        assert_eq!(app.message(), "Invalid identifier or secret");
    }
}
