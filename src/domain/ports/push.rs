//! Push notification boundary

use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{RoomId, UserId};
use async_trait::async_trait;
use std::collections::HashMap;

/// Ring pushes use a dedicated ringtone sound channel
pub const RING_SOUND: &str = "ringtone";

/// Provider-agnostic push payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
    /// Collapse tag, keyed by room so repeated rings replace each other
    pub tag: String,
    pub data: HashMap<String, String>,
    pub sound: Option<String>,
}

impl PushNotification {
    /// Payload for a ring or missed-call push
    pub fn ring(room_id: &RoomId, title: impl Into<String>, body: impl Into<String>) -> Self {
        let mut data = HashMap::new();
        data.insert("type".to_string(), "singleChat".to_string());
        data.insert("fromVChat".to_string(), "true".to_string());
        Self {
            title: title.into(),
            body: body.into(),
            tag: room_id.to_string(),
            data,
            sound: Some(RING_SOUND.to_string()),
        }
    }
}

/// Best-effort delivery across all registered provider channels of a user
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn deliver(&self, user_id: &UserId, notification: PushNotification) -> Result<()>;
}
