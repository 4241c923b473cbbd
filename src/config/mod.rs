//! Configuration management

use crate::domain::ports::settings::{AppConfigSource, CallConfig};
use crate::domain::shared::result::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub call: CallSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSettings {
    /// Global call-feature flag
    pub allow_call: bool,
    /// Ring deadline in milliseconds
    pub ring_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            call: CallSettings {
                allow_call: true,
                ring_timeout_ms: 60_000,
            },
        }
    }
}

impl Config {
    /// Create from environment variables or use defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = std::env::var("RINGHUB_ALLOW_CALL") {
            config.call.allow_call = v != "0" && !v.eq_ignore_ascii_case("false");
        }
        if let Ok(v) = std::env::var("RINGHUB_RING_TIMEOUT_MS") {
            if let Ok(ms) = v.parse() {
                config.call.ring_timeout_ms = ms;
            }
        }
        config
    }

    pub fn call_config(&self) -> CallConfig {
        CallConfig {
            allow_call: self.call.allow_call,
            ring_timeout: Duration::from_millis(self.call.ring_timeout_ms),
        }
    }
}

/// App-config source backed by a fixed in-process configuration
pub struct StaticConfigSource {
    config: CallConfig,
}

impl StaticConfigSource {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.call_config(),
        }
    }

    pub fn from_call_config(config: CallConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl AppConfigSource for StaticConfigSource {
    async fn call_config(&self) -> Result<CallConfig> {
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.call.allow_call);
        assert_eq!(config.call_config().ring_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("RINGHUB_ALLOW_CALL", "false");
        std::env::set_var("RINGHUB_RING_TIMEOUT_MS", "1500");
        let config = Config::from_env();
        std::env::remove_var("RINGHUB_ALLOW_CALL");
        std::env::remove_var("RINGHUB_RING_TIMEOUT_MS");

        assert!(!config.call.allow_call);
        assert_eq!(config.call.ring_timeout_ms, 1_500);
        assert_eq!(config.call_config().ring_timeout, Duration::from_millis(1_500));
    }

    #[tokio::test]
    async fn test_source_from_config() {
        let source = StaticConfigSource::new(&Config::default());
        let served = source.call_config().await.unwrap();
        assert!(served.allow_call);
        assert_eq!(served.ring_timeout, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_static_source_serves_call_config() {
        let source = StaticConfigSource::from_call_config(CallConfig {
            allow_call: false,
            ring_timeout: Duration::from_millis(500),
        });
        let served = source.call_config().await.unwrap();
        assert!(!served.allow_call);
        assert_eq!(served.ring_timeout, Duration::from_millis(500));
    }
}
