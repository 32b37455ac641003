//! Error conversions - HTTP rendering of [`AppError`]

use super::app_error::AppError;

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Internal detail never leaves the process
        let detail = if self.is_server_error() {
            "An unexpected error occurred"
        } else {
            self.message()
        };

        let body = serde_json::json!({
            "error": self.code(),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": detail,
        });

        (status, Json(body)).into_response()
    }
}
