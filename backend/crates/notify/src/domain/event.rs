//! Notification Events
//!
//! Wire form is `{"type": "...", "detail"?: "..."}`. Every event ends the
//! channel it is delivered on.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NotificationEvent {
    /// The watched state resolved
    Confirmed,
    /// The watch failed permanently
    Error { detail: String },
    /// Nothing resolved within the watch timeout
    TimedOut,
    /// A newer subscription for the same key replaced this one
    Superseded,
    /// The channel was closed from the server side
    Closed { detail: String },
}

impl NotificationEvent {
    pub fn error(detail: impl Into<String>) -> Self {
        Self::Error {
            detail: detail.into(),
        }
    }

    /// SSE `event:` field
    pub const fn event_type(&self) -> &'static str {
        match self {
            NotificationEvent::Confirmed => "Confirmed",
            NotificationEvent::Error { .. } => "Error",
            NotificationEvent::TimedOut => "TimedOut",
            NotificationEvent::Superseded => "Superseded",
            NotificationEvent::Closed { .. } => "Closed",
        }
    }
}
