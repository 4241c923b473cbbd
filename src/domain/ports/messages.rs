//! Call-result message recording boundary
//!
//! The only chat-storage surface the call core touches: persisting one
//! message per rejected, finished or missed call, which the room then
//! receives as a regular new-message event.

use crate::domain::session::value_object::CallStatus;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{MessageId, RoomId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Call metadata attached to a call-result message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallAttachment {
    pub call_status: CallStatus,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub with_video: bool,
}

/// Message to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCallMessage {
    pub room_id: RoomId,
    pub sender_id: UserId,
    pub sender_name: String,
    /// Human-readable summary, e.g. "📞 Missed Call from Alice"
    pub content: String,
    pub attachment: CallAttachment,
}

/// Persisted record as returned by the message store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallMessage {
    pub id: MessageId,
    pub room_id: RoomId,
    pub sender_id: UserId,
    pub sender_name: String,
    pub content: String,
    pub attachment: CallAttachment,
    pub created_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRecorder: Send + Sync {
    async fn create(&self, message: NewCallMessage) -> Result<CallMessage>;
}
