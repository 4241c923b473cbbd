//! Call session domain service
//!
//! The legacy cancel/reject/end endpoints plus the unified hang-up
//! endpoint collapse into one pure decision table on (role, status),
//! testable independently from the side-effecting transitions.

use super::value_object::{CallStatus, ParticipantRole};

/// Which concrete transition a hang-up request maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HangUpAction {
    /// Caller gives up while the callee is still being alerted
    Cancel,
    /// Callee declines while being alerted
    Reject,
    /// Either participant finishes a live call
    End,
}

/// Resolve a hang-up request to a transition. `None` means the session is
/// not in a hang-up-able status (already terminal).
pub fn decide_hang_up(role: ParticipantRole, status: CallStatus) -> Option<HangUpAction> {
    match (role, status) {
        (ParticipantRole::Caller, CallStatus::Ringing) => Some(HangUpAction::Cancel),
        (ParticipantRole::Callee, CallStatus::Ringing) => Some(HangUpAction::Reject),
        (_, CallStatus::InCall) => Some(HangUpAction::End),
        _ => None,
    }
}
