//! In-memory implementation of the call session store

use crate::domain::session::entity::CallSession;
use crate::domain::session::repository::{BusyConflict, CallSessionStore};
use crate::domain::session::value_object::CallStatus;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{RoomId, SessionId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
pub struct InMemoryCallSessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, CallSession>>>,
}

impl InMemoryCallSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl CallSessionStore for InMemoryCallSessionStore {
    async fn create_ringing(
        &self,
        session: CallSession,
    ) -> Result<std::result::Result<(), BusyConflict>> {
        if session.status != CallStatus::Ringing {
            return Err(DomainError::Validation(
                "new sessions must enter in Ringing status".to_string(),
            ));
        }

        // Single write-lock critical section: the busy scan and the insert
        // are atomic with respect to concurrent creates.
        let mut sessions = self.sessions.write().await;
        for existing in sessions.values() {
            if !existing.is_active() {
                continue;
            }
            if existing.room_id == session.room_id {
                return Ok(Err(BusyConflict::Room));
            }
            if existing.involves(&session.caller) {
                return Ok(Err(BusyConflict::Caller));
            }
            if existing.involves(&session.callee) {
                return Ok(Err(BusyConflict::Peer));
            }
        }

        debug!(session_id = %session.id, room_id = %session.room_id, "session created");
        sessions.insert(session.id, session);
        Ok(Ok(()))
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<CallSession>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn transition(
        &self,
        id: &SessionId,
        expected: CallStatus,
        next: CallStatus,
        end_at: Option<DateTime<Utc>>,
    ) -> Result<CallSession> {
        if !expected.can_transition_to(&next) {
            return Err(DomainError::Validation(format!(
                "transition {} -> {} is not allowed",
                expected.as_str(),
                next.as_str()
            )));
        }

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("call session {id}")))?;

        if session.status != expected {
            return Err(DomainError::Conflict(format!(
                "session {id} is {} (expected {})",
                session.status.as_str(),
                expected.as_str()
            )));
        }

        session.status = next;
        if end_at.is_some() {
            session.end_at = end_at;
        }
        debug!(
            session_id = %id,
            from = expected.as_str(),
            to = next.as_str(),
            "session transitioned"
        );
        Ok(session.clone())
    }

    async fn find_ringing_for_callee(&self, user: &UserId) -> Result<Option<CallSession>> {
        Ok(self
            .sessions
            .read()
            .await
            .values()
            .find(|s| s.status == CallStatus::Ringing && s.callee == *user)
            .cloned())
    }

    async fn find_recent_for_user(&self, user: &UserId, limit: usize) -> Result<Vec<CallSession>> {
        let sessions = self.sessions.read().await;
        let mut matching: Vec<CallSession> = sessions
            .values()
            .filter(|s| {
                s.involves(user)
                    && s.status != CallStatus::SessionEnd
                    && !s.deleted_by.contains(user)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit);
        Ok(matching)
    }

    async fn mark_all_deleted_for(&self, user: &UserId) -> Result<u64> {
        let mut sessions = self.sessions.write().await;
        let mut touched = 0;
        for session in sessions.values_mut() {
            if session.involves(user) && session.deleted_by.insert(*user) {
                touched += 1;
            }
        }
        debug!(user_id = %user, touched, "history soft-deleted");
        Ok(touched)
    }

    async fn mark_one_deleted_for(&self, id: &SessionId, user: &UserId) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("call session {id}")))?;
        session.deleted_by.insert(*user);
        Ok(())
    }

    async fn find_active_for_room(&self, room_id: &RoomId) -> Result<Vec<CallSession>> {
        Ok(self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.room_id == *room_id && s.is_active())
            .cloned()
            .collect())
    }
}
