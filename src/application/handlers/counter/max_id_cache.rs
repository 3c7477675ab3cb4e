//! MaxIdCache - Caches the highest assigned id per entity kind.
//!
//! Stored as the scalar `max_<kind>_id` in the counter cache. Rebuilt after
//! rows are created and lazily on a cache miss.

use std::sync::Arc;

use crate::domain::counter::{CounterError, EntityKind};
use crate::ports::{CounterCache, CounterStore};

pub struct MaxIdCache {
    cache: Arc<dyn CounterCache>,
    store: Arc<dyn CounterStore>,
}

impl MaxIdCache {
    pub fn new(cache: Arc<dyn CounterCache>, store: Arc<dyn CounterStore>) -> Self {
        Self { cache, store }
    }

    /// Scalar name for a kind, e.g. `max_chapter_id`.
    pub fn scalar_name(kind: EntityKind) -> String {
        format!("max_{}_id", kind.as_str())
    }

    /// Recomputes the max id from the durable store and overwrites the scalar.
    ///
    /// An empty table is cached as 0.
    pub async fn rebuild(&self, kind: EntityKind) -> Result<i64, CounterError> {
        let max = self
            .store
            .max_id(kind)
            .await?
            .map_or(0, |id| id.value());

        self.cache.put_scalar(&Self::scalar_name(kind), max).await?;
        tracing::debug!(kind = %kind, max, "Rebuilt max id scalar");
        Ok(max)
    }

    /// Cached max id, rebuilding on a miss.
    pub async fn get(&self, kind: EntityKind) -> Result<i64, CounterError> {
        match self.cache.get_scalar(&Self::scalar_name(kind)).await? {
            Some(max) => Ok(max),
            None => self.rebuild(kind).await,
        }
    }
}
