//! Notification Channel
//!
//! Registry of live subscriber channels, one slot per key. Whoever removes a
//! slot from the registry is the only party allowed to send on it, which is
//! what keeps delivery to at most one event per channel.

use std::sync::Arc;

use dashmap::DashMap;
use kernel::id::ChannelId;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::domain::event::NotificationEvent;
use crate::domain::subscriber_key::SubscriberKey;

#[derive(Debug)]
struct Slot {
    id: ChannelId,
    sender: UnboundedSender<NotificationEvent>,
}

type Registry = DashMap<SubscriberKey, Slot>;

/// Receiving end of one subscription. Dropping it releases the slot.
#[derive(Debug)]
pub struct ChannelHandle {
    key: SubscriberKey,
    id: ChannelId,
    receiver: UnboundedReceiver<NotificationEvent>,
    registry: Arc<Registry>,
}

impl ChannelHandle {
    pub fn key(&self) -> &SubscriberKey {
        &self.key
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Wait for the channel's event; `None` once the channel has ended
    pub async fn recv(&mut self) -> Option<NotificationEvent> {
        self.receiver.recv().await
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        let id = self.id;
        if self
            .registry
            .remove_if(&self.key, |_, slot| slot.id == id)
            .is_some()
        {
            tracing::debug!(subscriber_key = %self.key, "Subscriber went away, channel released");
        }
    }
}

/// Sending side shared by the poller and the rest of the server
#[derive(Debug, Clone, Default)]
pub struct NotificationChannel {
    registry: Arc<Registry>,
}

impl NotificationChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel for `key`, superseding any live one.
    ///
    /// The swap is a single map insert, so two handles for one key are never
    /// both registered.
    pub fn open(&self, key: SubscriberKey) -> ChannelHandle {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = ChannelId::new();

        let previous = self.registry.insert(key.clone(), Slot { id, sender });

        if let Some(previous) = previous {
            let _ = previous.sender.send(NotificationEvent::Superseded);
            tracing::info!(subscriber_key = %key, "Existing subscription superseded");
        }

        tracing::debug!(subscriber_key = %key, channel_id = %id, "Channel opened");

        ChannelHandle {
            key,
            id,
            receiver,
            registry: self.registry.clone(),
        }
    }

    /// Deliver `event` to whatever channel is live for `key` and end it.
    ///
    /// Returns false (not an error) when nobody is listening.
    pub fn push(&self, key: &SubscriberKey, event: NotificationEvent) -> bool {
        match self.registry.remove(key) {
            Some((_, slot)) => send(key, slot, event),
            None => {
                tracing::debug!(subscriber_key = %key, "No live channel, event dropped");
                false
            }
        }
    }

    /// End the channel for `key` with a `Closed` event carrying `reason`
    pub fn close(&self, key: &SubscriberKey, reason: &str) -> bool {
        self.push(
            key,
            NotificationEvent::Closed {
                detail: reason.to_string(),
            },
        )
    }

    /// Like [`push`](Self::push), but only if `id` is still the live channel
    pub(crate) fn deliver(
        &self,
        key: &SubscriberKey,
        id: ChannelId,
        event: NotificationEvent,
    ) -> bool {
        match self.registry.remove_if(key, |_, slot| slot.id == id) {
            Some((_, slot)) => send(key, slot, event),
            None => false,
        }
    }

    /// Sender clone of channel `id`, if it is still the live one for `key`
    pub(crate) fn bind(
        &self,
        key: &SubscriberKey,
        id: ChannelId,
    ) -> Option<UnboundedSender<NotificationEvent>> {
        self.registry
            .get(key)
            .filter(|slot| slot.id == id)
            .map(|slot| slot.sender.clone())
    }

    pub fn is_open(&self, key: &SubscriberKey) -> bool {
        self.registry
            .get(key)
            .is_some_and(|slot| !slot.sender.is_closed())
    }

    /// Number of registered channels
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

fn send(key: &SubscriberKey, slot: Slot, event: NotificationEvent) -> bool {
    let kind = event.event_type();
    match slot.sender.send(event) {
        Ok(()) => {
            tracing::debug!(subscriber_key = %key, event = kind, "Event delivered");
            true
        }
        Err(_) => {
            tracing::debug!(subscriber_key = %key, event = kind, "Subscriber already gone");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> SubscriberKey {
        SubscriberKey::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_push_delivers_once_then_noop() {
        let channel = NotificationChannel::new();
        let mut handle = channel.open(key("42"));

        assert!(channel.push(&key("42"), NotificationEvent::Confirmed));
        assert!(!channel.push(&key("42"), NotificationEvent::TimedOut));

        assert_eq!(handle.recv().await, Some(NotificationEvent::Confirmed));
        assert_eq!(handle.recv().await, None);
        assert!(channel.is_empty());
    }

    #[tokio::test]
    async fn test_push_without_subscriber_is_noop() {
        let channel = NotificationChannel::new();
        assert!(!channel.push(&key("nobody"), NotificationEvent::Confirmed));
    }

    #[tokio::test]
    async fn test_second_open_supersedes_first() {
        let channel = NotificationChannel::new();
        let mut first = channel.open(key("42"));
        let mut second = channel.open(key("42"));

        assert_eq!(first.recv().await, Some(NotificationEvent::Superseded));
        assert_eq!(first.recv().await, None);

        assert_eq!(channel.len(), 1);
        assert!(channel.is_open(&key("42")));

        // Dropping the stale handle must not release the new slot
        drop(first);
        assert!(channel.is_open(&key("42")));

        assert!(channel.push(&key("42"), NotificationEvent::Confirmed));
        assert_eq!(second.recv().await, Some(NotificationEvent::Confirmed));
    }

    #[tokio::test]
    async fn test_close_ends_channel_with_reason() {
        let channel = NotificationChannel::new();
        let mut handle = channel.open(key("42"));

        assert!(channel.close(&key("42"), "shutting down"));
        assert_eq!(
            handle.recv().await,
            Some(NotificationEvent::Closed {
                detail: "shutting down".into()
            })
        );
        assert!(!channel.push(&key("42"), NotificationEvent::Confirmed));
    }

    #[tokio::test]
    async fn test_dropping_handle_releases_slot() {
        let channel = NotificationChannel::new();
        let handle = channel.open(key("42"));
        assert_eq!(channel.len(), 1);

        drop(handle);
        assert!(channel.is_empty());
    }

    #[tokio::test]
    async fn test_deliver_ignores_stale_id() {
        let channel = NotificationChannel::new();
        let first = channel.open(key("42"));
        let stale = first.id();
        let mut second = channel.open(key("42"));

        assert!(!channel.deliver(&key("42"), stale, NotificationEvent::Confirmed));
        assert!(channel.deliver(&key("42"), second.id(), NotificationEvent::TimedOut));
        assert_eq!(second.recv().await, Some(NotificationEvent::TimedOut));
    }
}
