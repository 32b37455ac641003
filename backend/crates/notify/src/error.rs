//! Notify Error Types
//!
//! Request-level failures of the subscribe endpoint. Poll failures never
//! surface here; they reach the client as a stream event.

use axum::extract::rejection::QueryRejection;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::subscriber_key::InvalidSubscriberKey;

pub type NotifyResult<T> = Result<T, NotifyError>;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Invalid subscriber key: {0}")]
    InvalidSubscriberKey(#[from] InvalidSubscriberKey),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl NotifyError {
    pub fn code(&self) -> &'static str {
        match self {
            NotifyError::InvalidSubscriberKey(_) => "InvalidSubscriberKey",
            NotifyError::MalformedRequest(_) => "MalformedRequest",
            NotifyError::Internal(_) => "InternalError",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            NotifyError::InvalidSubscriberKey(_) | NotifyError::MalformedRequest(_) => {
                ErrorKind::BadRequest
            }
            NotifyError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string()).with_code(self.code())
    }

    fn log(&self) {
        match self {
            NotifyError::Internal(msg) => {
                tracing::error!(message = %msg, "Notify internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Rejected subscription request");
            }
        }
    }
}

impl IntoResponse for NotifyError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<QueryRejection> for NotifyError {
    fn from(rejection: QueryRejection) -> Self {
        NotifyError::MalformedRequest(rejection.body_text())
    }
}
