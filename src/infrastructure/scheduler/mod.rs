//! Cancelable deferred tasks keyed by session id
//!
//! One registry instance is owned by each orchestrator, never a
//! process-wide singleton. Lifecycle: register on Ringing entry, cancel on
//! any exit from Ringing, self-clear after firing. A fired task removes
//! its own entry before running the callback, so a concurrent cancel can
//! never lead to a double fire.

use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::SessionId;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Default)]
pub struct TimeoutScheduler {
    tasks: Arc<Mutex<HashMap<SessionId, JoinHandle<()>>>>,
}

impl TimeoutScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register exactly one deferred task for `id`. Re-registering an id
    /// that is still pending is rejected.
    pub fn schedule<F>(&self, id: SessionId, delay: Duration, task: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().expect("scheduler mutex poisoned");
        if tasks.contains_key(&id) {
            warn!(session_id = %id, "timeout task already registered");
            return Err(DomainError::Conflict(format!(
                "timeout task already registered for session {id}"
            )));
        }

        let registry = Arc::clone(&self.tasks);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Claim the entry before invoking the callback. Losing the
            // claim means a cancel won the race.
            let claimed = registry
                .lock()
                .expect("scheduler mutex poisoned")
                .remove(&id)
                .is_some();
            if claimed {
                debug!(session_id = %id, "timeout task fired");
                task.await;
            }
        });

        // The spawned task cannot claim its entry before this insert: it
        // blocks on the registry lock held by this scope.
        tasks.insert(id, handle);
        debug!(session_id = %id, delay_ms = delay.as_millis() as u64, "timeout task scheduled");
        Ok(())
    }

    /// Cancel the pending task for `id`. Idempotent: canceling an absent,
    /// already-fired or already-canceled task is a no-op.
    pub fn cancel(&self, id: &SessionId) {
        let removed = self
            .tasks
            .lock()
            .expect("scheduler mutex poisoned")
            .remove(id);
        if let Some(handle) = removed {
            handle.abort();
            debug!(session_id = %id, "timeout task canceled");
        }
    }

    /// Number of pending tasks
    pub fn len(&self) -> usize {
        self.tasks.lock().expect("scheduler mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for TimeoutScheduler {
    fn drop(&mut self) {
        let mut tasks = self.tasks.lock().expect("scheduler mutex poisoned");
        for (_, handle) in tasks.drain() {
            handle.abort();
        }
    }
}
