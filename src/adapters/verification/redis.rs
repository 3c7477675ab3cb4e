//! Redis-backed verification code store.
//!
//! Codes are stored under `verify:{target}` with `SET .. EX`, so Redis
//! expires them on its own.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::VerificationCodeStore;

use super::generate_code;

#[derive(Clone)]
pub struct RedisVerificationCodeStore {
    conn: MultiplexedConnection,
}

impl RedisVerificationCodeStore {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    fn key(target: &str) -> String {
        format!("verify:{}", target)
    }
}

fn cache_error(e: redis::RedisError) -> DomainError {
    DomainError::new(
        ErrorCode::CacheError,
        format!("verification store unavailable: {}", e),
    )
}

#[async_trait]
impl VerificationCodeStore for RedisVerificationCodeStore {
    async fn issue(&self, target: &str, ttl: Duration) -> Result<String, DomainError> {
        let code = generate_code();
        let mut conn = self.conn.clone();

        redis::cmd("SET")
            .arg(Self::key(target))
            .arg(&code)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(cache_error)?;

        Ok(code)
    }

    async fn verify(&self, target: &str, code: &str) -> Result<bool, DomainError> {
        let mut conn = self.conn.clone();
        let stored: Option<String> = conn.get(Self::key(target)).await.map_err(cache_error)?;
        Ok(stored.as_deref() == Some(code))
    }
}

impl std::fmt::Debug for RedisVerificationCodeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisVerificationCodeStore")
            .finish_non_exhaustive()
    }
}
