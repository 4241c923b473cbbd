//! Call session value objects

use serde::{Deserialize, Serialize};

/// Call session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CallStatus {
    /// Callee is being alerted
    Ringing,
    /// Call has been accepted and is live
    InCall,
    /// Call completed normally
    Finished,
    /// Caller gave up before the callee answered
    Canceled,
    /// Callee declined the call
    Rejected,
    /// Ring deadline elapsed without an answer
    Timeout,
    /// Externally-assigned terminal marker, excluded from active queries
    /// and never produced by orchestrator operations
    SessionEnd,
}

impl CallStatus {
    /// Check if a state transition is valid
    pub fn can_transition_to(&self, next: &CallStatus) -> bool {
        use CallStatus::*;

        match (self, next) {
            // From Ringing
            (Ringing, InCall) => true,
            (Ringing, Canceled) => true,
            (Ringing, Rejected) => true,
            (Ringing, Timeout) => true,

            // From InCall
            (InCall, Finished) => true,
            // Accept rolls back to Timeout when the caller device is gone
            (InCall, Timeout) => true,

            // All other states are terminal
            _ => false,
        }
    }

    /// A session in an active status blocks new calls for its room and
    /// for both of its participants.
    pub fn is_active(&self) -> bool {
        matches!(self, CallStatus::Ringing | CallStatus::InCall)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Ringing => "ringing",
            CallStatus::InCall => "inCall",
            CallStatus::Finished => "finished",
            CallStatus::Canceled => "canceled",
            CallStatus::Rejected => "rejected",
            CallStatus::Timeout => "timeout",
            CallStatus::SessionEnd => "sessionEnd",
        }
    }
}

/// Platform the media session is negotiated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CallPlatform {
    #[default]
    WebRtc,
    Agora,
}

/// Role of an actor inside a given session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantRole {
    Caller,
    Callee,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ringing_transitions() {
        use CallStatus::*;
        assert!(Ringing.can_transition_to(&InCall));
        assert!(Ringing.can_transition_to(&Canceled));
        assert!(Ringing.can_transition_to(&Rejected));
        assert!(Ringing.can_transition_to(&Timeout));
        assert!(!Ringing.can_transition_to(&Finished));
        assert!(!Ringing.can_transition_to(&SessionEnd));
    }

    #[test]
    fn test_in_call_transitions() {
        use CallStatus::*;
        assert!(InCall.can_transition_to(&Finished));
        assert!(InCall.can_transition_to(&Timeout));
        assert!(!InCall.can_transition_to(&Canceled));
        assert!(!InCall.can_transition_to(&Rejected));
        assert!(!InCall.can_transition_to(&Ringing));
    }

    #[test]
    fn test_terminal_states_have_no_outgoing_transitions() {
        use CallStatus::*;
        let all = [Ringing, InCall, Finished, Canceled, Rejected, Timeout, SessionEnd];
        for terminal in [Finished, Canceled, Rejected, Timeout, SessionEnd] {
            for next in all {
                assert!(
                    !terminal.can_transition_to(&next),
                    "{terminal:?} must not transition to {next:?}"
                );
            }
        }
    }

    #[test]
    fn test_active_statuses() {
        assert!(CallStatus::Ringing.is_active());
        assert!(CallStatus::InCall.is_active());
        assert!(CallStatus::Finished.is_terminal());
        assert!(CallStatus::SessionEnd.is_terminal());
    }
}
