//! Notify (Status Notification) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Subscriber keys, notification events, the status check trait
//! - `application/` - Notification channel registry and status poller
//! - `presentation/` - SSE subscribe handler and router
//!
//! ## Lifecycle
//! - One live channel per subscriber key; opening again supersedes the old one
//! - Every event ends its channel, so a subscriber sees exactly one
//! - Each watch is bounded by a timeout and cancelled when the client goes away

pub mod application;
pub mod domain;
pub mod error;
pub mod presentation;

// Re-exports for convenience
pub use application::channel::{ChannelHandle, NotificationChannel};
pub use application::config::NotifyConfig;
pub use application::poller::{StatusPoller, WatchOutcome};
pub use domain::check::{CheckOutcome, StatusCheck};
pub use domain::event::NotificationEvent;
pub use domain::subscriber_key::SubscriberKey;
pub use error::{NotifyError, NotifyResult};
pub use presentation::router::notify_router;

#[cfg(test)]
mod tests;
