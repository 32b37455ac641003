//! Notify Router

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::application::channel::NotificationChannel;
use crate::application::config::NotifyConfig;
use crate::application::poller::StatusPoller;
use crate::domain::check::StatusCheck;
use crate::presentation::handlers::{self, NotifyAppState};

/// Create the notify router.
///
/// The caller keeps its own clone of `channel` to push or close from outside
/// the poll loop.
pub fn notify_router<C>(check: C, channel: NotificationChannel, config: NotifyConfig) -> Router
where
    C: StatusCheck + Send + Sync + 'static,
{
    let state = NotifyAppState {
        poller: StatusPoller::new(channel.clone(), config.retry_budget),
        channel,
        check: Arc::new(check),
        config,
    };

    Router::new()
        .route("/notifications/subscribe", get(handlers::subscribe::<C>))
        .with_state(state)
}
