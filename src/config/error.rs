//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Log filter must not be empty")]
    EmptyLogFilter,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Sync batch size must be between 1 and 10000")]
    InvalidBatchSize,

    #[error("Sync poll interval must be between 10ms and 1h")]
    InvalidPollInterval,

    #[error("Invalid from email address")]
    InvalidFromEmail,

    #[error("Verification code lifetime must be between 1 and 60 minutes")]
    InvalidCodeTtl,
}
