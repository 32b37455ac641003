//! Session Gateway
//!
//! Composition root for the HTTP surface:
//! - `POST /login`, `POST /token/refresh`, `GET /session` (session crate)
//! - `GET /notifications/subscribe` (notify crate, watching email confirmation)

use std::sync::Arc;

use axum::Router;
use kernel::error::app_error::AppError;
use notify::{NotificationChannel, NotifyConfig, notify_router};
use session::TokenIssuer;
use session::domain::repository::PrincipalDirectory;

use crate::confirmation::EmailConfirmationCheck;

/// Build the full router over one principal directory
pub fn gateway_router<D>(
    directory: D,
    issuer: Arc<TokenIssuer>,
    channel: NotificationChannel,
    notify: NotifyConfig,
) -> Router
where
    D: PrincipalDirectory + Clone + Send + Sync + 'static,
{
    let confirmation = EmailConfirmationCheck::new(directory.clone());

    Router::new()
        .merge(session::session_router_generic(directory, issuer))
        .merge(notify_router(confirmation, channel, notify))
        .fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::not_found("Route not found")
}
