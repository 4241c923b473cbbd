//! Store interfaces for call sessions and participant joins
//!
//! Defined in the domain layer as traits (ports) and implemented in the
//! infrastructure layer (adapters). The busy check and every status
//! transition are conditional primitives of the store itself, never a
//! read-then-write at the caller.

use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{RoomId, SessionId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::entity::{CallParticipantJoin, CallSession};
use super::value_object::CallStatus;

/// Which busy invariant a conditional insert ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyConflict {
    /// The room already has an active session
    Room,
    /// The caller is part of an active session
    Caller,
    /// The callee is part of an active session
    Peer,
}

/// Repository interface for call sessions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallSessionStore: Send + Sync {
    /// Insert a Ringing session if and only if no active session exists
    /// for its room or for either participant. The check and the insert
    /// are atomic with respect to concurrent calls.
    async fn create_ringing(&self, session: CallSession)
        -> Result<std::result::Result<(), BusyConflict>>;

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<CallSession>>;

    /// Compare-and-swap on status: move the session from `expected` to
    /// `next`, setting `end_at` when given. Fails with Validation when
    /// `CallStatus::can_transition_to` forbids the pair, and with Conflict
    /// when the stored status no longer matches `expected`; never
    /// overwrites silently. Returns the updated session.
    async fn transition(
        &self,
        id: &SessionId,
        expected: CallStatus,
        next: CallStatus,
        end_at: Option<DateTime<Utc>>,
    ) -> Result<CallSession>;

    /// The pending Ringing session where `user` is the callee, if any
    async fn find_ringing_for_callee(&self, user: &UserId) -> Result<Option<CallSession>>;

    /// Newest-first sessions involving `user`, excluding SessionEnd and
    /// records soft-deleted by `user`, capped at `limit`
    async fn find_recent_for_user(&self, user: &UserId, limit: usize) -> Result<Vec<CallSession>>;

    /// Add `user` to the soft-delete set of every session involving them.
    /// Set-union semantics: idempotent, the counterpart is unaffected.
    /// Returns the number of sessions touched.
    async fn mark_all_deleted_for(&self, user: &UserId) -> Result<u64>;

    /// Add `user` to the soft-delete set of one session
    async fn mark_one_deleted_for(&self, id: &SessionId, user: &UserId) -> Result<()>;

    /// All active sessions of a room (diagnostic / invariant checks)
    async fn find_active_for_room(&self, room_id: &RoomId) -> Result<Vec<CallSession>>;
}

/// Repository interface for per-session device join records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallParticipantStore: Send + Sync {
    /// Append a join record. At most one per participant per session.
    async fn insert(&self, join: CallParticipantJoin) -> Result<()>;

    async fn find_by_session_and_user(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
    ) -> Result<Option<CallParticipantJoin>>;
}
