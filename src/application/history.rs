//! Call history read model with per-user soft deletion

use crate::domain::ports::directory::UserDirectory;
use crate::domain::session::repository::CallSessionStore;
use crate::domain::session::value_object::{CallPlatform, CallStatus};
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{RoomId, SessionId, UserId, UserProfile};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Most recent sessions returned per user
const HISTORY_LIMIT: usize = 30;

/// One history row, enriched with the counterpart's profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallHistoryEntry {
    pub session_id: SessionId,
    pub room_id: RoomId,
    pub call_status: CallStatus,
    pub with_video: bool,
    pub platform: CallPlatform,
    pub end_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// The counterpart of the requesting user, never the user themself
    pub peer: UserProfile,
}

pub struct HistoryProjector {
    sessions: Arc<dyn CallSessionStore>,
    directory: Arc<dyn UserDirectory>,
}

impl HistoryProjector {
    pub fn new(sessions: Arc<dyn CallSessionStore>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { sessions, directory }
    }

    /// Up to 30 newest-first sessions where `user` is caller or callee,
    /// excluding SessionEnd markers and records the user soft-deleted.
    pub async fn calls_history(&self, user: UserId) -> Result<Vec<CallHistoryEntry>> {
        let sessions = self
            .sessions
            .find_recent_for_user(&user, HISTORY_LIMIT)
            .await?;

        let mut entries = Vec::with_capacity(sessions.len());
        for session in sessions {
            // find_recent_for_user only returns sessions involving the user
            let peer_id = match session.peer_of(&user) {
                Some(peer_id) => peer_id,
                None => continue,
            };
            let peer = self.directory.profile(&peer_id).await?;
            entries.push(CallHistoryEntry {
                session_id: session.id,
                room_id: session.room_id,
                call_status: session.status,
                with_video: session.with_video,
                platform: session.platform,
                end_at: session.end_at,
                created_at: session.created_at,
                peer,
            });
        }
        debug!(user_id = %user, entries = entries.len(), "history projected");
        Ok(entries)
    }

    /// Hide every session involving `user` from their history. Set-union
    /// semantics: idempotent, and the counterpart's view is untouched.
    pub async fn delete_all_history(&self, user: UserId) -> Result<()> {
        let touched = self.sessions.mark_all_deleted_for(&user).await?;
        debug!(user_id = %user, touched, "history cleared");
        Ok(())
    }

    /// Hide a single session from `user`'s history
    pub async fn delete_one_history(&self, session_id: SessionId, user: UserId) -> Result<()> {
        self.sessions.mark_one_deleted_for(&session_id, &user).await
    }
}
