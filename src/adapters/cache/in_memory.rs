//! In-memory counter cache and dirty set for testing and single-process runs.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::counter::{ClampPolicy, CounterError, CounterField, CounterKey};
use crate::ports::{CounterCache, CounterSnapshot, DirtySet};

#[derive(Debug, Default)]
struct Counters {
    values: HashMap<CounterKey, CounterSnapshot>,
    seeded: HashSet<(CounterKey, CounterField)>,
}

/// In-memory counter cache.
///
/// A single write lock guards every adjustment, so increments on the same
/// (key, field) are serialized. `set_available(false)` makes every call fail
/// with [`CounterError::CacheUnavailable`], simulating an outage.
#[derive(Debug, Clone)]
pub struct InMemoryCounterCache {
    counters: Arc<RwLock<Counters>>,
    scalars: Arc<RwLock<HashMap<String, i64>>>,
    policy: ClampPolicy,
    available: Arc<AtomicBool>,
}

impl InMemoryCounterCache {
    pub fn new() -> Self {
        Self::with_policy(ClampPolicy::default())
    }

    pub fn with_policy(policy: ClampPolicy) -> Self {
        Self {
            counters: Arc::new(RwLock::new(Counters::default())),
            scalars: Arc::new(RwLock::new(HashMap::new())),
            policy,
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Toggles simulated availability.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), CounterError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CounterError::cache("in-memory cache marked unavailable"))
        }
    }
}

impl Default for InMemoryCounterCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterCache for InMemoryCounterCache {
    async fn increment(
        &self,
        key: CounterKey,
        field: CounterField,
        by: i64,
    ) -> Result<i64, CounterError> {
        self.ensure_available()?;

        let mut counters = self.counters.write().await;
        let value = counters.values.entry(key).or_default().entry(field).or_insert(0);
        *value = self.policy.adjust(*value, by);
        Ok(*value)
    }

    async fn get(&self, key: CounterKey, field: CounterField) -> Result<Option<i64>, CounterError> {
        self.ensure_available()?;

        let counters = self.counters.read().await;
        Ok(counters.values.get(&key).and_then(|fields| fields.get(&field)).copied())
    }

    async fn is_seeded(&self, key: CounterKey, field: CounterField) -> Result<bool, CounterError> {
        self.ensure_available()?;
        Ok(self.counters.read().await.seeded.contains(&(key, field)))
    }

    async fn apply_baseline(
        &self,
        key: CounterKey,
        field: CounterField,
        durable: i64,
    ) -> Result<Option<i64>, CounterError> {
        self.ensure_available()?;

        let mut counters = self.counters.write().await;
        if !counters.seeded.insert((key, field)) {
            return Ok(None);
        }
        let value = counters.values.entry(key).or_default().entry(field).or_insert(0);
        *value = self.policy.adjust(*value, durable);
        Ok(Some(*value))
    }

    async fn snapshot(&self, key: CounterKey) -> Result<CounterSnapshot, CounterError> {
        self.ensure_available()?;

        let counters = self.counters.read().await;
        Ok(counters.values.get(&key).cloned().unwrap_or_default())
    }

    async fn get_scalar(&self, name: &str) -> Result<Option<i64>, CounterError> {
        self.ensure_available()?;
        Ok(self.scalars.read().await.get(name).copied())
    }

    async fn put_scalar(&self, name: &str, value: i64) -> Result<(), CounterError> {
        self.ensure_available()?;
        self.scalars.write().await.insert(name.to_string(), value);
        Ok(())
    }
}

/// In-memory dirty set.
///
/// `claim` drains under one mutex, which makes it atomic with respect to
/// concurrent claimers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirtySet {
    keys: Arc<Mutex<HashSet<CounterKey>>>,
}

impl InMemoryDirtySet {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DirtySet for InMemoryDirtySet {
    async fn add(&self, key: CounterKey) -> Result<(), CounterError> {
        self.keys.lock().await.insert(key);
        Ok(())
    }

    async fn claim(&self, max: usize) -> Result<Vec<CounterKey>, CounterError> {
        let mut keys = self.keys.lock().await;
        let claimed: Vec<CounterKey> = keys.iter().take(max).copied().collect();
        for key in &claimed {
            keys.remove(key);
        }
        Ok(claimed)
    }

    async fn contains(&self, key: CounterKey) -> Result<bool, CounterError> {
        Ok(self.keys.lock().await.contains(&key))
    }

    async fn len(&self) -> Result<usize, CounterError> {
        Ok(self.keys.lock().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::EntityId;

    fn consult(id: i64) -> CounterKey {
        CounterKey::consult(EntityId::new(id).unwrap())
    }

    #[tokio::test]
    async fn increment_creates_from_zero() {
        let cache = InMemoryCounterCache::new();

        let value = cache
            .increment(consult(42), CounterField::LikeCount, 1)
            .await
            .unwrap();

        assert_eq!(value, 1);
        assert_eq!(
            cache.get(consult(42), CounterField::LikeCount).await.unwrap(),
            Some(1)
        );
    }

    #[tokio::test]
    async fn get_untouched_field_is_none() {
        let cache = InMemoryCounterCache::new();
        assert_eq!(
            cache.get(consult(1), CounterField::LikeCount).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn decrement_below_zero_depends_on_policy() {
        let unclamped = InMemoryCounterCache::new();
        let clamped = InMemoryCounterCache::with_policy(ClampPolicy::AtZero);

        let raw = unclamped
            .decrement(consult(5), CounterField::LikeCount, 1)
            .await
            .unwrap();
        let floored = clamped
            .decrement(consult(5), CounterField::LikeCount, 1)
            .await
            .unwrap();

        assert_eq!(raw, -1);
        assert_eq!(floored, 0);
    }

    #[tokio::test]
    async fn baseline_is_folded_in_once() {
        let cache = InMemoryCounterCache::new();
        cache.increment(consult(3), CounterField::LikeCount, 2).await.unwrap();
        assert!(!cache.is_seeded(consult(3), CounterField::LikeCount).await.unwrap());

        let first = cache
            .apply_baseline(consult(3), CounterField::LikeCount, 10)
            .await
            .unwrap();
        let second = cache
            .apply_baseline(consult(3), CounterField::LikeCount, 99)
            .await
            .unwrap();

        assert_eq!(first, Some(12));
        assert_eq!(second, None);
        assert!(cache.is_seeded(consult(3), CounterField::LikeCount).await.unwrap());
        assert!(!cache.is_seeded(consult(3), CounterField::UserCount).await.unwrap());
        assert_eq!(
            cache.get(consult(3), CounterField::LikeCount).await.unwrap(),
            Some(12)
        );
    }

    #[tokio::test]
    async fn snapshot_returns_all_fields() {
        let cache = InMemoryCounterCache::new();
        cache.increment(consult(9), CounterField::LikeCount, 2).await.unwrap();
        cache.increment(consult(9), CounterField::UserCount, 5).await.unwrap();

        let snapshot = cache.snapshot(consult(9)).await.unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[&CounterField::UserCount], 5);
        assert!(cache.snapshot(consult(10)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unavailable_cache_fails_every_call() {
        let cache = InMemoryCounterCache::new();
        cache.set_available(false);

        let err = cache
            .increment(consult(1), CounterField::LikeCount, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, CounterError::CacheUnavailable(_)));
        assert!(cache.get_scalar("max_chapter_id").await.is_err());

        cache.set_available(true);
        assert!(cache.increment(consult(1), CounterField::LikeCount, 1).await.is_ok());
    }

    #[tokio::test]
    async fn scalars_overwrite() {
        let cache = InMemoryCounterCache::new();
        cache.put_scalar("max_course_id", 10).await.unwrap();
        cache.put_scalar("max_course_id", 12).await.unwrap();

        assert_eq!(cache.get_scalar("max_course_id").await.unwrap(), Some(12));
        assert_eq!(cache.get_scalar("max_review_id").await.unwrap(), None);
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let cache = InMemoryCounterCache::new();
        let mut tasks = Vec::new();
        for _ in 0..50 {
            let cache = cache.clone();
            tasks.push(tokio::spawn(async move {
                cache
                    .increment(consult(42), CounterField::LikeCount, 1)
                    .await
                    .unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(
            cache.get(consult(42), CounterField::LikeCount).await.unwrap(),
            Some(50)
        );
    }

    #[tokio::test]
    async fn dirty_set_deduplicates() {
        let dirty = InMemoryDirtySet::new();
        dirty.add(consult(1)).await.unwrap();
        dirty.add(consult(1)).await.unwrap();

        assert_eq!(dirty.len().await.unwrap(), 1);
        assert!(dirty.contains(consult(1)).await.unwrap());
    }

    #[tokio::test]
    async fn claim_removes_up_to_max() {
        let dirty = InMemoryDirtySet::new();
        for id in 1..=5 {
            dirty.add(consult(id)).await.unwrap();
        }

        let first = dirty.claim(3).await.unwrap();
        let second = dirty.claim(3).await.unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 2);
        assert!(dirty.is_empty().await.unwrap());
        assert!(first.iter().all(|key| !second.contains(key)));
    }

    #[tokio::test]
    async fn concurrent_claims_are_disjoint() {
        let dirty = InMemoryDirtySet::new();
        for id in 1..=100 {
            dirty.add(consult(id)).await.unwrap();
        }

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let dirty = dirty.clone();
            tasks.push(tokio::spawn(async move { dirty.claim(20).await.unwrap() }));
        }

        let mut seen = HashSet::new();
        let mut total = 0;
        for task in tasks {
            for key in task.await.unwrap() {
                total += 1;
                assert!(seen.insert(key), "key {} claimed twice", key);
            }
        }
        assert_eq!(total, 100);
    }
}
