//! Counter synchronisation settings.

use serde::Deserialize;
use std::time::Duration;

use crate::application::handlers::counter::CounterSyncerConfig;
use crate::domain::counter::ClampPolicy;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Maximum keys claimed per flush
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Milliseconds between flushes
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Whether decrements stop at zero
    #[serde(default)]
    pub clamp: ClampPolicy,
}

impl SyncConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn syncer_config(&self) -> CounterSyncerConfig {
        CounterSyncerConfig::default()
            .with_batch_size(self.batch_size)
            .with_poll_interval(self.poll_interval())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.batch_size == 0 || self.batch_size > 10_000 {
            return Err(ValidationError::InvalidBatchSize);
        }
        if !(10..=3_600_000).contains(&self.poll_interval_ms) {
            return Err(ValidationError::InvalidPollInterval);
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            poll_interval_ms: default_poll_interval_ms(),
            clamp: ClampPolicy::default(),
        }
    }
}

fn default_batch_size() -> usize {
    100
}

fn default_poll_interval_ms() -> u64 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.clamp, ClampPolicy::Unclamped);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn feeds_syncer_config() {
        let config = SyncConfig {
            batch_size: 25,
            poll_interval_ms: 250,
            ..Default::default()
        };

        let syncer = config.syncer_config();

        assert_eq!(syncer.batch_size, 25);
        assert_eq!(syncer.poll_interval, Duration::from_millis(250));
    }

    #[test]
    fn rejects_degenerate_values() {
        let zero_batch = SyncConfig {
            batch_size: 0,
            ..Default::default()
        };
        let busy_loop = SyncConfig {
            poll_interval_ms: 1,
            ..Default::default()
        };

        assert!(matches!(zero_batch.validate(), Err(ValidationError::InvalidBatchSize)));
        assert!(matches!(busy_loop.validate(), Err(ValidationError::InvalidPollInterval)));
    }
}
