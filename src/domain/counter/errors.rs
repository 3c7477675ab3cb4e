//! Counter cache and sync errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors raised along the counter fast path and durability path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CounterError {
    /// The cache backend could not be reached.
    #[error("counter cache unavailable: {0}")]
    CacheUnavailable(String),

    /// The durable store rejected a counter write.
    #[error("counter store write failed: {0}")]
    StoreWriteFailed(String),

    /// The durable store could not supply a baseline value.
    #[error("counter store read failed: {0}")]
    StoreReadFailed(String),

    /// An event could not be interpreted as a counter adjustment.
    #[error("invalid counter event: {0}")]
    InvalidEvent(String),
}

impl CounterError {
    pub fn cache(err: impl ToString) -> Self {
        CounterError::CacheUnavailable(err.to_string())
    }

    pub fn store(err: impl ToString) -> Self {
        CounterError::StoreWriteFailed(err.to_string())
    }

    pub fn store_read(err: impl ToString) -> Self {
        CounterError::StoreReadFailed(err.to_string())
    }
}

impl From<CounterError> for DomainError {
    fn from(err: CounterError) -> Self {
        let code = match &err {
            CounterError::CacheUnavailable(_) => ErrorCode::CacheError,
            CounterError::StoreWriteFailed(_) | CounterError::StoreReadFailed(_) => {
                ErrorCode::DatabaseError
            }
            CounterError::InvalidEvent(_) => ErrorCode::ValidationFailed,
        };
        DomainError::new(code, err.to_string())
    }
}
