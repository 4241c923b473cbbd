//! In-memory implementation of the participant join store

use crate::domain::session::entity::CallParticipantJoin;
use crate::domain::session::repository::CallParticipantStore;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{SessionId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
pub struct InMemoryCallParticipantStore {
    joins: Arc<RwLock<Vec<CallParticipantJoin>>>,
}

impl InMemoryCallParticipantStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CallParticipantStore for InMemoryCallParticipantStore {
    async fn insert(&self, join: CallParticipantJoin) -> Result<()> {
        let mut joins = self.joins.write().await;
        let duplicate = joins
            .iter()
            .any(|j| j.session_id == join.session_id && j.user_id == join.user_id);
        if duplicate {
            return Err(DomainError::Conflict(format!(
                "participant {} already joined session {}",
                join.user_id, join.session_id
            )));
        }
        debug!(session_id = %join.session_id, user_id = %join.user_id, "participant joined");
        joins.push(join);
        Ok(())
    }

    async fn find_by_session_and_user(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
    ) -> Result<Option<CallParticipantJoin>> {
        Ok(self
            .joins
            .read()
            .await
            .iter()
            .find(|j| j.session_id == *session_id && j.user_id == *user_id)
            .cloned())
    }
}
