//! Counter cache and dirty set adapters.
//!
//! - `InMemoryCounterCache` / `InMemoryDirtySet` - For testing and single-process runs
//! - `RedisCounterCache` / `RedisDirtySet` - Redis-backed for multi-server deployments

mod in_memory;
mod redis;

pub use in_memory::{InMemoryCounterCache, InMemoryDirtySet};
pub use self::redis::{RedisCounterCache, RedisDirtySet, DIRTY_SET_KEY};
