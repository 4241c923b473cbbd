//! Call orchestration - the distributed state machine behind 1:1 calls
//!
//! Validates preconditions, drives the session/participant stores and the
//! timeout scheduler, and emits socket and push notifications. All status
//! mutation goes through the store's conditional primitives: the busy
//! check is a conditional insert and every transition a compare-and-swap,
//! so concurrent requests and timer callbacks can never overwrite each
//! other silently.

use crate::domain::ports::membership::{ResolvedMember, RoomMembershipGuard};
use crate::domain::ports::messages::{CallAttachment, MessageRecorder, NewCallMessage};
use crate::domain::ports::notifier::RealtimeNotifier;
use crate::domain::ports::push::{PushGateway, PushNotification};
use crate::domain::ports::settings::AppConfigSource;
use crate::domain::ports::directory::UserDirectory;
use crate::domain::session::entity::{CallParticipantJoin, CallSession};
use crate::domain::session::event::CallSignal;
use crate::domain::session::repository::{BusyConflict, CallParticipantStore, CallSessionStore};
use crate::domain::session::service::{decide_hang_up, HangUpAction};
use crate::domain::session::value_object::{CallPlatform, CallStatus};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{DeviceId, RoomId, SessionId, UserId, UserProfile};
use crate::infrastructure::scheduler::TimeoutScheduler;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Request to start ringing a room's peer
#[derive(Debug, Clone)]
pub struct CreateCallRequest {
    pub room_id: RoomId,
    pub caller: UserId,
    /// Device the caller rings from; its socket receives the answer later
    pub caller_device: DeviceId,
    pub with_video: bool,
    pub platform: CallPlatform,
    /// Opaque offer payload (SDP or platform token), passed through
    pub payload: serde_json::Value,
}

/// Request to accept a ringing session
#[derive(Debug, Clone)]
pub struct AcceptCallRequest {
    pub session_id: SessionId,
    pub acceptor: UserId,
    pub acceptor_device: DeviceId,
    /// Opaque answer payload delivered to the caller's device
    pub answer: serde_json::Value,
}

/// The pending ring a reconnecting client should surface
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RingingCall {
    pub session_id: SessionId,
    pub room_id: RoomId,
    pub caller: UserProfile,
    pub with_video: bool,
}

pub struct CallOrchestrator {
    sessions: Arc<dyn CallSessionStore>,
    participants: Arc<dyn CallParticipantStore>,
    guard: Arc<dyn RoomMembershipGuard>,
    notifier: Arc<dyn RealtimeNotifier>,
    push: Arc<dyn PushGateway>,
    messages: Arc<dyn MessageRecorder>,
    directory: Arc<dyn UserDirectory>,
    settings: Arc<dyn AppConfigSource>,
    scheduler: Arc<TimeoutScheduler>,
}

impl CallOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sessions: Arc<dyn CallSessionStore>,
        participants: Arc<dyn CallParticipantStore>,
        guard: Arc<dyn RoomMembershipGuard>,
        notifier: Arc<dyn RealtimeNotifier>,
        push: Arc<dyn PushGateway>,
        messages: Arc<dyn MessageRecorder>,
        directory: Arc<dyn UserDirectory>,
        settings: Arc<dyn AppConfigSource>,
        scheduler: Arc<TimeoutScheduler>,
    ) -> Self {
        Self {
            sessions,
            participants,
            guard,
            notifier,
            push,
            messages,
            directory,
            settings,
            scheduler,
        }
    }

    /// Start ringing the peer of a 1:1 room.
    ///
    /// Non-direct rooms (no resolvable peer) short-circuit: a session id
    /// is returned without persisting or notifying anything, bypassing
    /// the feature flag and busy checks. This keeps the legacy
    /// passthrough for broadcast/live contexts intact.
    pub async fn create_call(self: &Arc<Self>, request: CreateCallRequest) -> Result<SessionId> {
        let (config, member) = tokio::join!(
            self.settings.call_config(),
            self.checked_member(&request.room_id, &request.caller)
        );
        let member = member?;
        let config = config?;

        let peer = match member.peer_id {
            Some(peer) => peer,
            None => {
                // Not a direct room; might be a live session
                let session_id = SessionId::new();
                info!(
                    room_id = %request.room_id,
                    session_id = %session_id,
                    "no resolvable peer, returning passthrough session id"
                );
                return Ok(session_id);
            }
        };

        if !config.allow_call {
            return Err(DomainError::CallsDisabled);
        }

        let session = CallSession::ringing(
            SessionId::new(),
            request.room_id,
            request.caller,
            peer,
            request.with_video,
            request.platform,
        );
        let session_id = session.id;

        match self.sessions.create_ringing(session).await? {
            Ok(()) => {}
            Err(BusyConflict::Room) => return Err(DomainError::RoomBusy),
            Err(BusyConflict::Caller) => return Err(DomainError::CallerBusy),
            Err(BusyConflict::Peer) => return Err(DomainError::PeerBusy),
        }

        self.participants
            .insert(CallParticipantJoin::new(
                session_id,
                request.caller,
                request.caller_device,
                request.room_id,
            ))
            .await?;

        let caller_profile = self.directory.profile(&request.caller).await?;

        // Ring push first, then the live socket signal
        let ring_push = PushNotification::ring(
            &request.room_id,
            caller_profile.full_name.clone(),
            format!("📞 New call from {}", caller_profile.full_name),
        );
        if let Err(e) = self.push.deliver(&peer, ring_push).await {
            warn!(session_id = %session_id, error = %e, "ring push delivery failed");
        }

        let signal = CallSignal::NewCall {
            session_id,
            room_id: request.room_id,
            caller: caller_profile,
            with_video: request.with_video,
            payload: request.payload,
        };
        if let Err(e) = self.notifier.emit_to_user(&peer, &signal).await {
            warn!(session_id = %session_id, error = %e, "ring socket delivery failed");
        }

        let this = Arc::clone(self);
        self.scheduler
            .schedule(session_id, config.ring_timeout, async move {
                this.handle_ring_timeout(peer, session_id).await;
            })?;

        info!(
            session_id = %session_id,
            room_id = %request.room_id,
            caller = %request.caller,
            callee = %peer,
            with_video = request.with_video,
            "call ringing"
        );
        Ok(session_id)
    }

    /// Accept a ringing session as its callee.
    ///
    /// The transition to InCall happens before the caller-device lookup
    /// and is rolled back to Timeout (not re-validated) when the lookup
    /// fails, so no orphaned active session survives an offline caller.
    pub async fn accept_call(&self, request: AcceptCallRequest) -> Result<SessionId> {
        let session = self.find_session(&request.session_id).await?;
        self.require_status(&session, CallStatus::Ringing)?;
        if session.callee != request.acceptor {
            return Err(DomainError::AccessDenied(
                "only the callee can accept this call".to_string(),
            ));
        }
        self.checked_member(&session.room_id, &request.acceptor).await?;

        self.participants
            .insert(CallParticipantJoin::new(
                session.id,
                request.acceptor,
                request.acceptor_device,
                session.room_id,
            ))
            .await?;

        self.sessions
            .transition(&session.id, CallStatus::Ringing, CallStatus::InCall, None)
            .await?;

        let caller_join = self
            .participants
            .find_by_session_and_user(&session.id, &session.caller)
            .await?
            .ok_or_else(|| {
                DomainError::Internal(format!("caller join record missing for {}", session.id))
            })?;

        // No lock is held across this external lookup
        let connection = self.notifier.resolve_device(&caller_join.device_id).await?;
        let connection = match connection {
            Some(connection) => connection,
            None => {
                // Roll back rather than leave an orphaned active session
                if let Err(e) = self
                    .sessions
                    .transition(&session.id, CallStatus::InCall, CallStatus::Timeout, None)
                    .await
                {
                    warn!(session_id = %session.id, error = %e, "accept rollback raced");
                }
                self.scheduler.cancel(&session.id);
                return Err(DomainError::DeviceOffline);
            }
        };

        let signal = CallSignal::CallAccepted {
            session_id: session.id,
            room_id: session.room_id,
            answer: request.answer,
        };
        if let Err(e) = connection.emit(&signal).await {
            warn!(session_id = %session.id, error = %e, "accept delivery failed");
        }

        self.scheduler.cancel(&session.id);
        info!(session_id = %session.id, acceptor = %request.acceptor, "call accepted");
        Ok(session.id)
    }

    /// Decline a ringing session as its callee. Persists a call-result
    /// message and broadcasts it to the room.
    pub async fn reject_call(&self, session_id: SessionId, actor: UserId) -> Result<()> {
        let session = self.find_session(&session_id).await?;
        self.require_status(&session, CallStatus::Ringing)?;
        if session.callee != actor {
            return Err(DomainError::AccessDenied(
                "only the callee can reject this call".to_string(),
            ));
        }
        self.checked_member(&session.room_id, &actor).await?;

        self.sessions
            .transition(&session_id, CallStatus::Ringing, CallStatus::Rejected, None)
            .await?;
        self.scheduler.cancel(&session_id);

        let signal = CallSignal::CallRejected {
            session_id,
            room_id: session.room_id,
        };
        if let Err(e) = self.notifier.emit_to_user(&session.caller, &signal).await {
            warn!(session_id = %session_id, error = %e, "reject delivery failed");
        }

        let sender = self.directory.profile(&actor).await?;
        let message = self
            .messages
            .create(NewCallMessage {
                room_id: session.room_id,
                sender_id: actor,
                sender_name: sender.full_name,
                content: "📞".to_string(),
                attachment: CallAttachment {
                    call_status: CallStatus::Rejected,
                    start_at: None,
                    end_at: None,
                    with_video: session.with_video,
                },
            })
            .await?;
        self.broadcast_message(&session.room_id, message).await;

        info!(session_id = %session_id, actor = %actor, "call rejected");
        Ok(())
    }

    /// Abandon a ringing session as its caller. No call-result message is
    /// persisted for cancels, unlike rejects and timeouts.
    pub async fn cancel_call(&self, session_id: SessionId, actor: UserId) -> Result<()> {
        let session = self.find_session(&session_id).await?;
        self.require_status(&session, CallStatus::Ringing)?;
        if session.caller != actor {
            return Err(DomainError::AccessDenied(
                "only the caller can cancel this call".to_string(),
            ));
        }
        self.checked_member(&session.room_id, &actor).await?;

        self.sessions
            .transition(&session_id, CallStatus::Ringing, CallStatus::Canceled, None)
            .await?;
        self.scheduler.cancel(&session_id);

        let signal = CallSignal::CallCanceled {
            session_id,
            room_id: session.room_id,
        };
        if let Err(e) = self.notifier.emit_to_user(&session.callee, &signal).await {
            warn!(session_id = %session_id, error = %e, "cancel delivery failed");
        }

        info!(session_id = %session_id, actor = %actor, "call canceled");
        Ok(())
    }

    /// Finish a live session as either participant. Persists a
    /// call-summary message with the call duration.
    pub async fn end_call(&self, session_id: SessionId, actor: UserId) -> Result<()> {
        let session = self.find_session(&session_id).await?;
        self.require_status(&session, CallStatus::InCall)?;
        if session.role_of(&actor).is_none() {
            return Err(DomainError::AccessDenied(
                "only a call participant can end this call".to_string(),
            ));
        }
        self.checked_member(&session.room_id, &actor).await?;

        let ended_at = Utc::now();
        self.sessions
            .transition(
                &session_id,
                CallStatus::InCall,
                CallStatus::Finished,
                Some(ended_at),
            )
            .await?;

        let signal = CallSignal::CallEnded {
            session_id,
            room_id: session.room_id,
        };
        if let Err(e) = self.notifier.emit_to_room(&session.room_id, &signal).await {
            warn!(session_id = %session_id, error = %e, "end delivery failed");
        }

        let duration = ended_at - session.created_at;
        let sender = self.directory.profile(&actor).await?;
        let message = self
            .messages
            .create(NewCallMessage {
                room_id: session.room_id,
                sender_id: actor,
                sender_name: sender.full_name,
                content: format!("📞 {}", format_duration(duration)),
                attachment: CallAttachment {
                    call_status: CallStatus::Finished,
                    start_at: Some(session.created_at),
                    end_at: Some(ended_at),
                    with_video: session.with_video,
                },
            })
            .await?;
        self.broadcast_message(&session.room_id, message).await;

        info!(
            session_id = %session_id,
            actor = %actor,
            duration_secs = duration.num_seconds(),
            "call ended"
        );
        Ok(())
    }

    /// Unified hang-up: resolves the actor's role and the session status
    /// to the matching transition (cancel/reject/end) and dispatches to
    /// it. Replaces the three legacy endpoints.
    pub async fn hang_up(&self, session_id: SessionId, actor: UserId) -> Result<()> {
        let session = self.find_session(&session_id).await?;
        self.checked_member(&session.room_id, &actor).await?;

        let role = session.role_of(&actor).ok_or_else(|| {
            DomainError::AccessDenied("only a call participant can hang up".to_string())
        })?;
        let action = decide_hang_up(role, session.status).ok_or_else(|| {
            DomainError::Conflict(format!(
                "session {session_id} is already {}",
                session.status.as_str()
            ))
        })?;

        debug!(session_id = %session_id, ?action, "hang-up dispatched");
        match action {
            HangUpAction::Cancel => self.cancel_call(session_id, actor).await,
            HangUpAction::Reject => self.reject_call(session_id, actor).await,
            HangUpAction::End => self.end_call(session_id, actor).await,
        }
    }

    /// Fired by the timeout scheduler once the ring deadline elapses.
    ///
    /// Re-reads the current status instead of trusting the value captured
    /// at schedule time: the task may race with accept/reject/cancel, and
    /// a lost race must be a no-op. The push towards the peer is sent
    /// even when their connection is live; it doubles as the durable
    /// missed-call record on the device.
    pub async fn handle_ring_timeout(&self, peer_id: UserId, session_id: SessionId) {
        let session = match self.sessions.find_by_id(&session_id).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                warn!(session_id = %session_id, "timeout fired for unknown session");
                return;
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "timeout read failed");
                return;
            }
        };
        if session.status != CallStatus::Ringing {
            debug!(
                session_id = %session_id,
                status = session.status.as_str(),
                "timeout fired after ringing ended, no-op"
            );
            return;
        }

        match self
            .sessions
            .transition(&session_id, CallStatus::Ringing, CallStatus::Timeout, None)
            .await
        {
            Ok(_) => {}
            Err(DomainError::Conflict(_)) => {
                // Superseded between the read and the swap
                debug!(session_id = %session_id, "timeout superseded, no-op");
                return;
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "timeout transition failed");
                return;
            }
        }

        let caller_name = match self.directory.profile(&session.caller).await {
            Ok(profile) => profile.full_name,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "caller profile lookup failed");
                "Unknown".to_string()
            }
        };
        let content = format!("📞 Missed Call from {caller_name}");

        match self
            .messages
            .create(NewCallMessage {
                room_id: session.room_id,
                sender_id: session.caller,
                sender_name: caller_name.clone(),
                content: content.clone(),
                attachment: CallAttachment {
                    call_status: CallStatus::Timeout,
                    start_at: Some(session.created_at),
                    end_at: None,
                    with_video: session.with_video,
                },
            })
            .await
        {
            Ok(message) => self.broadcast_message(&session.room_id, message).await,
            Err(e) => error!(session_id = %session_id, error = %e, "missed-call record failed"),
        }

        let signal = CallSignal::CallTimeout {
            session_id,
            room_id: session.room_id,
        };
        if let Err(e) = self.notifier.emit_to_room(&session.room_id, &signal).await {
            warn!(session_id = %session_id, error = %e, "timeout delivery failed");
        }

        let push = PushNotification::ring(&session.room_id, caller_name, content);
        if let Err(e) = self.push.deliver(&peer_id, push).await {
            warn!(session_id = %session_id, error = %e, "missed-call push failed");
        }

        info!(session_id = %session_id, peer = %peer_id, "call timed out");
    }

    /// The pending ring towards `user`, if any. Lets a reconnecting
    /// client surface an incoming call it missed the socket event for.
    pub async fn ring_call_for(&self, user: UserId) -> Result<Option<RingingCall>> {
        let session = match self.sessions.find_ringing_for_callee(&user).await? {
            Some(session) => session,
            None => return Ok(None),
        };
        let caller = self.directory.profile(&session.caller).await?;
        Ok(Some(RingingCall {
            session_id: session.id,
            room_id: session.room_id,
            caller,
            with_video: session.with_video,
        }))
    }

    /// Membership plus ban resolution: NotFound for non-members,
    /// AccessDenied for banned members.
    async fn checked_member(&self, room_id: &RoomId, user_id: &UserId) -> Result<ResolvedMember> {
        let member = self.guard.resolve_member(room_id, user_id).await?;
        if member.is_banned {
            return Err(DomainError::AccessDenied(
                "you do not have access, you have been banned".to_string(),
            ));
        }
        Ok(member)
    }

    async fn find_session(&self, session_id: &SessionId) -> Result<CallSession> {
        self.sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("call session {session_id}")))
    }

    fn require_status(&self, session: &CallSession, expected: CallStatus) -> Result<()> {
        if session.status != expected {
            return Err(DomainError::Conflict(format!(
                "session {} is {} (expected {})",
                session.id,
                session.status.as_str(),
                expected.as_str()
            )));
        }
        Ok(())
    }

    async fn broadcast_message(
        &self,
        room_id: &RoomId,
        message: crate::domain::ports::messages::CallMessage,
    ) {
        let signal = CallSignal::NewMessage(message);
        if let Err(e) = self.notifier.emit_to_room(room_id, &signal).await {
            warn!(room_id = %room_id, error = %e, "message broadcast failed");
        }
    }
}

/// mm:ss, rolling over to hh:mm:ss past one hour
fn format_duration(duration: chrono::Duration) -> String {
    let total = duration.num_seconds().max(0);
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
