//! Status Poller
//!
//! Re-runs a [`StatusCheck`] on a fixed cadence and turns the first decisive
//! outcome into a channel event. One task per watch; the task ends when it
//! delivers, when the watch times out, or as soon as the subscriber's
//! receiver is dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::application::channel::{ChannelHandle, NotificationChannel};
use crate::domain::check::{CheckOutcome, StatusCheck};
use crate::domain::event::NotificationEvent;
use crate::domain::subscriber_key::SubscriberKey;

pub const NOT_FOUND_DETAIL: &str = "not found";
pub const CHECK_FAILED_DETAIL: &str = "check failed";

/// How a watch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    Confirmed,
    NotFound,
    /// Transient failures exceeded the retry budget
    CheckFailed,
    TimedOut,
    /// The subscriber left or was superseded before anything resolved
    Cancelled,
    /// The handle's channel was no longer live when the watch started
    Detached,
}

#[derive(Debug, Clone)]
pub struct StatusPoller {
    channel: NotificationChannel,
    retry_budget: u32,
}

impl StatusPoller {
    pub fn new(channel: NotificationChannel, retry_budget: u32) -> Self {
        Self {
            channel,
            retry_budget,
        }
    }

    /// Start polling `check` for the handle's key every `interval`, for at
    /// most `timeout`.
    ///
    /// The watch is tied to that handle's channel and to no other: if the
    /// handle has already been superseded or released the watch is
    /// `Detached`, and a later `open` for the same key cancels it.
    pub fn watch<C>(
        &self,
        handle: &ChannelHandle,
        check: Arc<C>,
        interval: Duration,
        timeout: Duration,
    ) -> JoinHandle<WatchOutcome>
    where
        C: StatusCheck + Send + Sync + 'static,
    {
        let channel = self.channel.clone();
        let retry_budget = self.retry_budget;
        let key = handle.key().clone();
        let id = handle.id();

        let Some(sender) = channel.bind(&key, id) else {
            tracing::debug!(subscriber_key = %key, channel_id = %id, "Channel no longer live");
            return tokio::spawn(async { WatchOutcome::Detached });
        };

        let started = Instant::now();

        tokio::spawn(async move {
            let deadline = time::sleep_until(started + timeout);
            tokio::pin!(deadline);

            let mut ticker = time::interval_at(started + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut failures: u32 = 0;

            let outcome = loop {
                tokio::select! {
                    biased;
                    _ = sender.closed() => break WatchOutcome::Cancelled,
                    _ = &mut deadline => break WatchOutcome::TimedOut,
                    _ = ticker.tick() => {}
                }

                // The check itself is raced too so a hung check cannot
                // outlive the timeout.
                let result = tokio::select! {
                    biased;
                    _ = sender.closed() => break WatchOutcome::Cancelled,
                    _ = &mut deadline => break WatchOutcome::TimedOut,
                    result = check.check(&key) => result,
                };

                match result {
                    CheckOutcome::Pending => failures = 0,
                    CheckOutcome::Confirmed => break WatchOutcome::Confirmed,
                    CheckOutcome::NotFound => break WatchOutcome::NotFound,
                    CheckOutcome::TransientError(detail) => {
                        failures += 1;
                        tracing::warn!(
                            subscriber_key = %key,
                            failures,
                            retry_budget,
                            error = %detail,
                            "Status check failed"
                        );
                        if failures > retry_budget {
                            break WatchOutcome::CheckFailed;
                        }
                    }
                }
            };

            // Our clone must not keep the receiver from seeing the end
            drop(sender);

            let event = match outcome {
                WatchOutcome::Confirmed => Some(NotificationEvent::Confirmed),
                WatchOutcome::NotFound => Some(NotificationEvent::error(NOT_FOUND_DETAIL)),
                WatchOutcome::CheckFailed => Some(NotificationEvent::error(CHECK_FAILED_DETAIL)),
                WatchOutcome::TimedOut => Some(NotificationEvent::TimedOut),
                WatchOutcome::Cancelled | WatchOutcome::Detached => None,
            };

            if let Some(event) = event {
                channel.deliver(&key, id, event);
            }

            tracing::debug!(subscriber_key = %key, outcome = ?outcome, "Watch finished");
            outcome
        })
    }
}
