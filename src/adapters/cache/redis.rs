//! Redis-backed counter cache and dirty set for production deployments.
//!
//! Each entity's counters live in one hash (`counter:{kind}:{id}`), one
//! field per counter plus a `seeded:{field}` marker once the durable
//! baseline has been folded in. Dirty keys live in a single set whose
//! members use the short `kind:id` form.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::collections::HashMap;

use crate::domain::counter::{ClampPolicy, CounterError, CounterField, CounterKey};
use crate::ports::{CounterCache, CounterSnapshot, DirtySet};

/// Default Redis key of the dirty set.
pub const DIRTY_SET_KEY: &str = "counter:dirty";

const SCALAR_PREFIX: &str = "scalar:";

const SEEDED_PREFIX: &str = "seeded:";

/// HINCRBY followed by a floor at zero, executed atomically server-side.
const CLAMPED_INCR_SCRIPT: &str = r#"
local value = redis.call('HINCRBY', KEYS[1], ARGV[1], ARGV[2])
if value < 0 then
  redis.call('HSET', KEYS[1], ARGV[1], 0)
  value = 0
end
return value
"#;

/// Marks the field seeded and adds the baseline, unless already marked.
/// ARGV: field, marker, baseline, clamp flag.
const APPLY_BASELINE_SCRIPT: &str = r#"
if redis.call('HSETNX', KEYS[1], ARGV[2], 1) == 0 then
  return false
end
local value = redis.call('HINCRBY', KEYS[1], ARGV[1], ARGV[3])
if ARGV[4] == '1' and value < 0 then
  redis.call('HSET', KEYS[1], ARGV[1], 0)
  value = 0
end
return value
"#;

fn unavailable(e: redis::RedisError) -> CounterError {
    CounterError::cache(e)
}

/// Redis-backed counter cache.
///
/// Unclamped increments are a plain HINCRBY. Under [`ClampPolicy::AtZero`]
/// a Lua script performs the increment and the floor in one step, so no
/// reader ever observes a negative value.
#[derive(Clone)]
pub struct RedisCounterCache {
    conn: MultiplexedConnection,
    policy: ClampPolicy,
    clamp_script: redis::Script,
    baseline_script: redis::Script,
}

impl RedisCounterCache {
    pub fn new(conn: MultiplexedConnection, policy: ClampPolicy) -> Self {
        Self {
            conn,
            policy,
            clamp_script: redis::Script::new(CLAMPED_INCR_SCRIPT),
            baseline_script: redis::Script::new(APPLY_BASELINE_SCRIPT),
        }
    }

    fn scalar_key(name: &str) -> String {
        format!("{}{}", SCALAR_PREFIX, name)
    }

    fn seeded_marker(field: CounterField) -> String {
        format!("{}{}", SEEDED_PREFIX, field.as_str())
    }
}

#[async_trait]
impl CounterCache for RedisCounterCache {
    async fn increment(
        &self,
        key: CounterKey,
        field: CounterField,
        by: i64,
    ) -> Result<i64, CounterError> {
        let mut conn = self.conn.clone();
        let redis_key = key.to_redis_key();

        let value: i64 = match self.policy {
            ClampPolicy::Unclamped => conn
                .hincr(&redis_key, field.as_str(), by)
                .await
                .map_err(unavailable)?,
            ClampPolicy::AtZero => {
                let mut invocation = self.clamp_script.key(&redis_key);
                invocation.arg(field.as_str()).arg(by);
                invocation.invoke_async(&mut conn).await.map_err(unavailable)?
            }
        };
        Ok(value)
    }

    async fn get(&self, key: CounterKey, field: CounterField) -> Result<Option<i64>, CounterError> {
        let mut conn = self.conn.clone();
        conn.hget(key.to_redis_key(), field.as_str())
            .await
            .map_err(unavailable)
    }

    async fn is_seeded(&self, key: CounterKey, field: CounterField) -> Result<bool, CounterError> {
        let mut conn = self.conn.clone();
        conn.hexists(key.to_redis_key(), Self::seeded_marker(field))
            .await
            .map_err(unavailable)
    }

    async fn apply_baseline(
        &self,
        key: CounterKey,
        field: CounterField,
        durable: i64,
    ) -> Result<Option<i64>, CounterError> {
        let mut conn = self.conn.clone();
        let clamp = matches!(self.policy, ClampPolicy::AtZero);

        let mut invocation = self.baseline_script.key(key.to_redis_key());
        invocation
            .arg(field.as_str())
            .arg(Self::seeded_marker(field))
            .arg(durable)
            .arg(if clamp { "1" } else { "0" });
        invocation.invoke_async(&mut conn).await.map_err(unavailable)
    }

    async fn snapshot(&self, key: CounterKey) -> Result<CounterSnapshot, CounterError> {
        let mut conn = self.conn.clone();
        let raw: HashMap<String, i64> = conn
            .hgetall(key.to_redis_key())
            .await
            .map_err(unavailable)?;

        let mut snapshot = CounterSnapshot::new();
        for (name, value) in raw {
            if name.starts_with(SEEDED_PREFIX) {
                continue;
            }
            match name.parse::<CounterField>() {
                Ok(field) => {
                    snapshot.insert(field, value);
                }
                Err(_) => {
                    tracing::debug!(key = %key, field = %name, "Ignoring unknown counter field");
                }
            }
        }
        Ok(snapshot)
    }

    async fn get_scalar(&self, name: &str) -> Result<Option<i64>, CounterError> {
        let mut conn = self.conn.clone();
        conn.get(Self::scalar_key(name)).await.map_err(unavailable)
    }

    async fn put_scalar(&self, name: &str, value: i64) -> Result<(), CounterError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(Self::scalar_key(name), value)
            .await
            .map_err(unavailable)
    }
}

impl std::fmt::Debug for RedisCounterCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCounterCache")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Redis-backed dirty set.
///
/// `claim` is a single `SPOP key count`, which removes and returns members
/// atomically.
#[derive(Clone)]
pub struct RedisDirtySet {
    conn: MultiplexedConnection,
    key: String,
}

impl RedisDirtySet {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self::with_key(conn, DIRTY_SET_KEY)
    }

    pub fn with_key(conn: MultiplexedConnection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }
}

#[async_trait]
impl DirtySet for RedisDirtySet {
    async fn add(&self, key: CounterKey) -> Result<(), CounterError> {
        let mut conn = self.conn.clone();
        conn.sadd::<_, _, ()>(&self.key, key.to_string())
            .await
            .map_err(unavailable)
    }

    async fn claim(&self, max: usize) -> Result<Vec<CounterKey>, CounterError> {
        if max == 0 {
            return Ok(Vec::new());
        }

        let mut conn = self.conn.clone();
        let members: Vec<String> = redis::cmd("SPOP")
            .arg(&self.key)
            .arg(max)
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;

        let mut keys = Vec::with_capacity(members.len());
        for member in members {
            match member.parse::<CounterKey>() {
                Ok(key) => keys.push(key),
                Err(e) => {
                    tracing::warn!(member = %member, error = %e, "Dropping malformed dirty set member");
                }
            }
        }
        Ok(keys)
    }

    async fn contains(&self, key: CounterKey) -> Result<bool, CounterError> {
        let mut conn = self.conn.clone();
        conn.sismember(&self.key, key.to_string())
            .await
            .map_err(unavailable)
    }

    async fn len(&self) -> Result<usize, CounterError> {
        let mut conn = self.conn.clone();
        conn.scard(&self.key).await.map_err(unavailable)
    }
}

impl std::fmt::Debug for RedisDirtySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisDirtySet")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
