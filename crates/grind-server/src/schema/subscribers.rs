//! Subscription request/response types.

use grind_core::Subscriber;
use serde::{Deserialize, Serialize};

/// Body of the public subscribe form.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
    /// Optional; omitting it keeps a previously stored name.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriberListResponse {
    pub subscribers: Vec<Subscriber>,
}
