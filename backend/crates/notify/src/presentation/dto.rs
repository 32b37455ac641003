//! API DTOs (Data Transfer Objects)

use serde::Deserialize;

/// `GET /notifications/subscribe?subscriberKey=...`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeQuery {
    pub subscriber_key: String,
}
