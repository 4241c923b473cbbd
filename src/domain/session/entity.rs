//! Call session entities

use crate::domain::shared::value_objects::{DeviceId, RoomId, SessionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::value_object::{CallPlatform, CallStatus, ParticipantRole};

/// One call instance (the "meet") between two participants of a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSession {
    pub id: SessionId,
    pub caller: UserId,
    pub callee: UserId,
    pub room_id: RoomId,
    pub status: CallStatus,
    pub with_video: bool,
    pub platform: CallPlatform,
    /// Set when the session leaves InCall
    pub end_at: Option<DateTime<Utc>>,
    /// Per-user soft-delete markers for call history
    pub deleted_by: HashSet<UserId>,
    pub created_at: DateTime<Utc>,
}

impl CallSession {
    /// Create a new session entering the Ringing state
    pub fn ringing(
        id: SessionId,
        room_id: RoomId,
        caller: UserId,
        callee: UserId,
        with_video: bool,
        platform: CallPlatform,
    ) -> Self {
        Self {
            id,
            caller,
            callee,
            room_id,
            status: CallStatus::Ringing,
            with_video,
            platform,
            end_at: None,
            deleted_by: HashSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn involves(&self, user: &UserId) -> bool {
        self.caller == *user || self.callee == *user
    }

    /// The counterpart of `user` in this session, never `user` itself
    pub fn peer_of(&self, user: &UserId) -> Option<UserId> {
        if self.caller == *user {
            Some(self.callee)
        } else if self.callee == *user {
            Some(self.caller)
        } else {
            None
        }
    }

    pub fn role_of(&self, user: &UserId) -> Option<ParticipantRole> {
        if self.caller == *user {
            Some(ParticipantRole::Caller)
        } else if self.callee == *user {
            Some(ParticipantRole::Callee)
        } else {
            None
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Per-session device join record, created once per participant: for the
/// caller at ring time, for the callee at accept time. Resolves which
/// device socket to target for direct delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallParticipantJoin {
    pub id: uuid::Uuid,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub device_id: DeviceId,
    pub room_id: RoomId,
    pub joined_at: DateTime<Utc>,
}

impl CallParticipantJoin {
    pub fn new(session_id: SessionId, user_id: UserId, device_id: DeviceId, room_id: RoomId) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            session_id,
            user_id,
            device_id,
            room_id,
            joined_at: Utc::now(),
        }
    }
}
