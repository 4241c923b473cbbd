//! User directory boundary

use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{UserId, UserProfile};
use async_trait::async_trait;

/// Resolves the minimal profile (name, image) shown in ring notifications
/// and history entries; fails NotFound for unknown users
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn profile(&self, user_id: &UserId) -> Result<UserProfile>;
}
