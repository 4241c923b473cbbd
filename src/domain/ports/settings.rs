//! Feature flag / app configuration boundary

use crate::domain::shared::result::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Call-feature configuration as served by the app-config store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallConfig {
    /// Global call-feature flag; creation fails when disabled
    pub allow_call: bool,
    /// How long a Ringing session waits before expiring to Timeout
    pub ring_timeout: Duration,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            allow_call: true,
            ring_timeout: Duration::from_secs(60),
        }
    }
}

/// Source of the current app configuration. Looked up per operation, so
/// flag flips take effect without a restart.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppConfigSource: Send + Sync {
    async fn call_config(&self) -> Result<CallConfig>;
}
