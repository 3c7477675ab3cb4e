//! Redis settings for the counter cache, dirty set and verification codes.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Set holding counter keys awaiting a flush
    #[serde(default = "default_dirty_set_key")]
    pub dirty_set_key: String,
}

impl RedisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("REDIS__URL"));
        }
        if !self.url.starts_with("redis://") && !self.url.starts_with("rediss://") {
            return Err(ValidationError::InvalidRedisUrl);
        }
        if self.dirty_set_key.is_empty() {
            return Err(ValidationError::MissingRequired("REDIS__DIRTY_SET_KEY"));
        }
        Ok(())
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: default_timeout(),
            dirty_set_key: default_dirty_set_key(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}

fn default_dirty_set_key() -> String {
    crate::adapters::cache::DIRTY_SET_KEY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RedisConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.dirty_set_key, "counter:dirty");
    }

    #[test]
    fn url_scheme_is_checked() {
        let plain = RedisConfig {
            url: "redis://localhost:6379".to_string(),
            ..Default::default()
        };
        let tls = RedisConfig {
            url: "rediss://cache.internal:6380".to_string(),
            ..Default::default()
        };
        let http = RedisConfig {
            url: "http://localhost:6379".to_string(),
            ..Default::default()
        };

        assert!(plain.validate().is_ok());
        assert!(tls.validate().is_ok());
        assert!(matches!(http.validate(), Err(ValidationError::InvalidRedisUrl)));
        assert!(RedisConfig::default().validate().is_err());
    }
}
