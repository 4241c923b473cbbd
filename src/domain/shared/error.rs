//! Domain errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The room already carries a Ringing or InCall session.
    #[error("Room already has an active call")]
    RoomBusy,

    /// The resolved peer is caller or callee of an active session elsewhere.
    #[error("Peer is busy in another call")]
    PeerBusy,

    /// The caller themself is still part of an active session.
    #[error("You are already in an active call")]
    CallerBusy,

    #[error("Calls are disabled by server configuration")]
    CallsDisabled,

    /// A transition's precondition status did not hold.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The caller's device connection could not be resolved during accept.
    /// The session has been forced to Timeout as a side effect.
    #[error("Peer device is offline")]
    DeviceOffline,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Whether this error belongs to the DomainConflict class: a busy
    /// room/peer at creation, a disabled feature flag, or a transition
    /// whose precondition status does not hold.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            DomainError::RoomBusy
                | DomainError::PeerBusy
                | DomainError::CallerBusy
                | DomainError::CallsDisabled
                | DomainError::Conflict(_)
        )
    }
}
