//! Status Check
//!
//! The external state a watch waits on, e.g. "has this principal confirmed
//! their email?". Implemented outside this crate.

use crate::domain::subscriber_key::SubscriberKey;

/// Result of one check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Not resolved yet; keep polling
    Pending,
    Confirmed,
    /// The subject does not exist
    NotFound,
    /// The check itself failed and may succeed on retry
    TransientError(String),
}

#[trait_variant::make(StatusCheck: Send)]
pub trait LocalStatusCheck {
    async fn check(&self, key: &SubscriberKey) -> CheckOutcome;
}
