//! Live connection delivery boundary
//!
//! Two-operation capability (emit-to-room, emit-to-user) plus device
//! handle resolution for the accept path. Delivery failures are the
//! adapter's concern: they are logged or retried there and never roll
//! back a committed state transition.

use crate::domain::session::event::CallSignal;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{DeviceId, RoomId, UserId};
use async_trait::async_trait;
use std::sync::Arc;

/// Handle to one live device connection
#[async_trait]
pub trait DeviceConnection: Send + Sync {
    async fn emit(&self, signal: &CallSignal) -> Result<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RealtimeNotifier: Send + Sync {
    /// Deliver to every connection subscribed to the room channel
    async fn emit_to_room(&self, room_id: &RoomId, signal: &CallSignal) -> Result<()>;

    /// Deliver to every connection of one user
    async fn emit_to_user(&self, user_id: &UserId, signal: &CallSignal) -> Result<()>;

    /// Resolve the live connection of a specific device, if one exists
    async fn resolve_device(&self, device_id: &DeviceId)
        -> Result<Option<Arc<dyn DeviceConnection>>>;
}
