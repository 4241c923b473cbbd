//! Wire events emitted towards live connections
//!
//! Event names keep the `v1On…` scheme of the socket protocol so existing
//! clients can subscribe unchanged. Payloads are serialized to JSON by the
//! notifier adapter.

use crate::domain::ports::messages::CallMessage;
use crate::domain::shared::value_objects::{RoomId, SessionId, UserProfile};
use serde::Serialize;

/// Signal delivered to a room channel, a user channel or a single device
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CallSignal {
    #[serde(rename_all = "camelCase")]
    NewCall {
        session_id: SessionId,
        room_id: RoomId,
        caller: UserProfile,
        with_video: bool,
        /// Opaque offer payload (SDP or platform token), passed through
        payload: serde_json::Value,
    },
    #[serde(rename_all = "camelCase")]
    CallAccepted {
        session_id: SessionId,
        room_id: RoomId,
        /// Opaque answer payload from the callee
        answer: serde_json::Value,
    },
    #[serde(rename_all = "camelCase")]
    CallCanceled { session_id: SessionId, room_id: RoomId },
    #[serde(rename_all = "camelCase")]
    CallRejected { session_id: SessionId, room_id: RoomId },
    #[serde(rename_all = "camelCase")]
    CallEnded { session_id: SessionId, room_id: RoomId },
    #[serde(rename_all = "camelCase")]
    CallTimeout { session_id: SessionId, room_id: RoomId },
    NewMessage(CallMessage),
}

impl CallSignal {
    /// Wire name of the socket event
    pub fn event_type(&self) -> &'static str {
        match self {
            CallSignal::NewCall { .. } => "v1OnNewCall",
            CallSignal::CallAccepted { .. } => "v1OnCallAccepted",
            CallSignal::CallCanceled { .. } => "v1OnCallCanceled",
            CallSignal::CallRejected { .. } => "v1OnCallRejected",
            CallSignal::CallEnded { .. } => "v1OnCallEnded",
            CallSignal::CallTimeout { .. } => "v1OnCallTimeout",
            CallSignal::NewMessage(_) => "v1OnNewMessage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::value_objects::UserId;

    #[test]
    fn test_event_types() {
        let signal = CallSignal::CallCanceled {
            session_id: SessionId::new(),
            room_id: RoomId::new(),
        };
        assert_eq!(signal.event_type(), "v1OnCallCanceled");
    }

    #[test]
    fn test_new_call_payload_shape() {
        let signal = CallSignal::NewCall {
            session_id: SessionId::new(),
            room_id: RoomId::new(),
            caller: UserProfile::new(UserId::new(), "Alice"),
            with_video: true,
            payload: serde_json::json!({"sdp": "offer"}),
        };

        let json = serde_json::to_value(&signal).unwrap();
        assert!(json.get("sessionId").is_some());
        assert!(json.get("roomId").is_some());
        assert_eq!(json["withVideo"], true);
        assert_eq!(json["caller"]["fullName"], "Alice");
    }
}
