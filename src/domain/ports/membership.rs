//! Room membership and ban resolution boundary

use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{RoomId, UserId};
use async_trait::async_trait;

/// Membership record of a user inside a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMember {
    /// The counterpart of the member in a 1:1 room. `None` marks a
    /// non-direct context (group/broadcast), which short-circuits call
    /// creation into the legacy passthrough.
    pub peer_id: Option<UserId>,
    /// Whether a ban exists between the member and their peer
    pub is_banned: bool,
}

/// Resolves room membership; fails NotFound when the user is not a member
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomMembershipGuard: Send + Sync {
    async fn resolve_member(&self, room_id: &RoomId, user_id: &UserId) -> Result<ResolvedMember>;
}
