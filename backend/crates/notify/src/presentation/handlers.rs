//! HTTP Handlers

use std::convert::Infallible;
use std::sync::Arc;

use async_stream::stream;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;

use crate::application::channel::NotificationChannel;
use crate::application::config::NotifyConfig;
use crate::application::poller::StatusPoller;
use crate::domain::check::StatusCheck;
use crate::domain::event::NotificationEvent;
use crate::domain::subscriber_key::SubscriberKey;
use crate::error::NotifyResult;
use crate::presentation::dto::SubscribeQuery;

/// Shared state for notify handlers
pub struct NotifyAppState<C>
where
    C: StatusCheck + Send + Sync + 'static,
{
    pub channel: NotificationChannel,
    pub poller: StatusPoller,
    pub check: Arc<C>,
    pub config: NotifyConfig,
}

impl<C> Clone for NotifyAppState<C>
where
    C: StatusCheck + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
            poller: self.poller.clone(),
            check: self.check.clone(),
            config: self.config,
        }
    }
}

/// GET /notifications/subscribe
///
/// Opens a channel for the subscriber key, starts a watch bound to that
/// channel alone, and streams the single resulting event. The stream ends
/// right after it.
pub async fn subscribe<C>(
    State(state): State<NotifyAppState<C>>,
    query: Result<Query<SubscribeQuery>, QueryRejection>,
) -> NotifyResult<Sse<impl Stream<Item = Result<Event, Infallible>>>>
where
    C: StatusCheck + Send + Sync + 'static,
{
    let Query(query) = query?;
    let key = SubscriberKey::parse(&query.subscriber_key)?;

    let mut handle = state.channel.open(key.clone());
    state.poller.watch(
        &handle,
        state.check.clone(),
        state.config.poll_interval,
        state.config.watch_timeout,
    );

    tracing::info!(subscriber_key = %key, "Subscriber connected");

    // Dropping the stream (client disconnect) drops the handle, which
    // releases the slot and cancels the watch.
    let stream = stream! {
        if let Some(event) = handle.recv().await {
            yield Ok::<_, Infallible>(to_sse_event(&event));
        }
        tracing::debug!(subscriber_key = %handle.key(), "Notification stream finished");
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn to_sse_event(event: &NotificationEvent) -> Event {
    let sse = Event::default().event(event.event_type());
    match serde_json::to_string(event) {
        Ok(json) => sse.data(json),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize notification event");
            sse.data("{}")
        }
    }
}
