//! Counter cache port - low-latency atomic counters per entity.
//!
//! The cache holds, for every [`CounterKey`], a hash of field → value. It is
//! the fast path for like/unlike traffic; the durable store only catches up
//! when the syncer flushes. Implementations can use in-memory storage for
//! testing or Redis for production.
//!
//! A field created by `increment` starts from 0 and holds only the deltas
//! applied since. It becomes the true count once the persisted value has
//! been folded in with [`CounterCache::apply_baseline`], which happens at
//! most once per field.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::domain::counter::{CounterError, CounterField, CounterKey};

/// All cached fields of one entity.
pub type CounterSnapshot = BTreeMap<CounterField, i64>;

/// Port for cached counter operations.
///
/// Every mutating operation must be atomic per (key, field).
#[async_trait]
pub trait CounterCache: Send + Sync {
    /// Adds `by` to the cached value, creating the entry from 0 if absent.
    ///
    /// Returns the new cached value after the clamp policy is applied.
    async fn increment(
        &self,
        key: CounterKey,
        field: CounterField,
        by: i64,
    ) -> Result<i64, CounterError>;

    /// Subtracts `by` from the cached value.
    async fn decrement(
        &self,
        key: CounterKey,
        field: CounterField,
        by: i64,
    ) -> Result<i64, CounterError> {
        self.increment(key, field, by.saturating_neg()).await
    }

    /// Returns the cached value, or `None` if the field was never touched.
    async fn get(&self, key: CounterKey, field: CounterField) -> Result<Option<i64>, CounterError>;

    /// Whether the durable baseline has been folded into this field.
    async fn is_seeded(&self, key: CounterKey, field: CounterField) -> Result<bool, CounterError>;

    /// Adds `durable` to the field and marks it seeded, atomically.
    ///
    /// Returns the new value, or `None` if the field was already seeded, in
    /// which case nothing changes.
    async fn apply_baseline(
        &self,
        key: CounterKey,
        field: CounterField,
        durable: i64,
    ) -> Result<Option<i64>, CounterError>;

    /// Returns every cached field of one entity (empty if none).
    async fn snapshot(&self, key: CounterKey) -> Result<CounterSnapshot, CounterError>;

    /// Reads a named derived scalar (e.g. `max_chapter_id`).
    async fn get_scalar(&self, name: &str) -> Result<Option<i64>, CounterError>;

    /// Overwrites a named derived scalar.
    async fn put_scalar(&self, name: &str, value: i64) -> Result<(), CounterError>;
}
