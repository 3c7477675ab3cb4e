//! CounterListener - Applies like/unlike events to cached counters.
//!
//! Each event adjusts `like_count` in the cache first and only then marks
//! the key dirty, so a key is never queued for a flush whose cache write
//! did not happen.
//!
//! Flushes overwrite the durable value with the cached one, so the cached
//! field must include what is already persisted. The first adjustment of a
//! field tries to fold the durable column in. When the store cannot be read
//! the like still succeeds; the field stays unseeded and the syncer folds
//! the baseline in before its first write.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::counter::{
    parse_like_event_type, CounterError, CounterField, CounterKey, LikeAction, LIKE_EVENT_TYPES,
};
use crate::domain::foundation::{DomainError, EntityId, EventEnvelope};
use crate::ports::{CounterCache, CounterStore, EventHandler, EventSubscriber};

use super::CounterSyncer;

/// Event handler for the like/unlike events of consults, reviews and chapters.
pub struct CounterListener {
    cache: Arc<dyn CounterCache>,
    store: Arc<dyn CounterStore>,
    syncer: Arc<CounterSyncer>,
}

impl CounterListener {
    pub fn new(
        cache: Arc<dyn CounterCache>,
        store: Arc<dyn CounterStore>,
        syncer: Arc<CounterSyncer>,
    ) -> Self {
        Self {
            cache,
            store,
            syncer,
        }
    }

    /// Every event type this listener handles.
    pub fn event_types() -> Vec<&'static str> {
        LIKE_EVENT_TYPES.iter().map(|(_, _, t)| *t).collect()
    }

    /// Subscribes the listener to all like/unlike event types.
    pub fn register(self: &Arc<Self>, subscriber: &dyn EventSubscriber) {
        subscriber.subscribe_all(&Self::event_types(), self.clone());
    }

    /// Increments the cached like count. Returns the new cached value.
    pub async fn on_like(&self, key: CounterKey) -> Result<i64, CounterError> {
        self.adjust(key, LikeAction::Like).await
    }

    /// Decrements the cached like count. Returns the new cached value.
    pub async fn on_unlike(&self, key: CounterKey) -> Result<i64, CounterError> {
        self.adjust(key, LikeAction::Unlike).await
    }

    async fn adjust(&self, key: CounterKey, action: LikeAction) -> Result<i64, CounterError> {
        let field = CounterField::LikeCount;

        self.try_seed(key, field).await?;
        let value = self.cache.increment(key, field, action.delta()).await?;
        self.syncer.add_item(key).await?;

        tracing::trace!(key = %key, ?action, value, "Like counter adjusted");
        Ok(value)
    }

    /// Folds the durable value into an unseeded field. Only cache errors
    /// are returned; a store failure leaves the field for the syncer.
    async fn try_seed(&self, key: CounterKey, field: CounterField) -> Result<(), CounterError> {
        if self.cache.is_seeded(key, field).await? {
            return Ok(());
        }

        match self.store.read_counter(key, field).await {
            Ok(durable) => {
                let durable = durable.unwrap_or(0);
                if let Some(value) = self.cache.apply_baseline(key, field, durable).await? {
                    tracing::debug!(key = %key, field = %field.as_str(), durable, value, "Seeded cached counter");
                }
            }
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    field = %field.as_str(),
                    error = %e,
                    "Durable baseline unavailable, deferring to syncer"
                );
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EventHandler for CounterListener {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let (kind, action) = parse_like_event_type(&event.event_type).ok_or_else(|| {
            CounterError::InvalidEvent(format!("unhandled event type '{}'", event.event_type))
        })?;

        let id: EntityId = event.aggregate_id.parse().map_err(|e| {
            CounterError::InvalidEvent(format!(
                "aggregate id '{}' is not an entity id: {}",
                event.aggregate_id, e
            ))
        })?;

        let key = CounterKey::new(kind, id);
        match action {
            LikeAction::Like => self.on_like(key).await?,
            LikeAction::Unlike => self.on_unlike(key).await?,
        };
        Ok(())
    }

    fn name(&self) -> &'static str {
        "CounterListener"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::{InMemoryCounterCache, InMemoryDirtySet};
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::storage::InMemoryCounterStore;
    use crate::domain::counter::{EntityKind, LikeToggled};
    use crate::domain::foundation::{ErrorCode, SerializableDomainEvent, UserId};
    use crate::ports::{DirtySet, EventPublisher};
    use serde_json::json;

    struct Fixture {
        cache: Arc<InMemoryCounterCache>,
        dirty: Arc<InMemoryDirtySet>,
        store: Arc<InMemoryCounterStore>,
        listener: Arc<CounterListener>,
    }

    fn fixture() -> Fixture {
        let cache = Arc::new(InMemoryCounterCache::new());
        let dirty = Arc::new(InMemoryDirtySet::new());
        let store = Arc::new(InMemoryCounterStore::new());
        let syncer = Arc::new(CounterSyncer::new(cache.clone(), dirty.clone(), store.clone()));
        let listener = Arc::new(CounterListener::new(cache.clone(), store.clone(), syncer));
        Fixture {
            cache,
            dirty,
            store,
            listener,
        }
    }

    fn key(kind: EntityKind, id: i64) -> CounterKey {
        CounterKey::new(kind, EntityId::new(id).unwrap())
    }

    #[tokio::test]
    async fn like_increments_and_marks_dirty() {
        let f = fixture();
        let consult = key(EntityKind::Consult, 42);

        let value = f.listener.on_like(consult).await.unwrap();

        assert_eq!(value, 1);
        assert!(f.dirty.contains(consult).await.unwrap());
    }

    #[tokio::test]
    async fn unlike_decrements() {
        let f = fixture();
        let review = key(EntityKind::Review, 3);

        f.listener.on_like(review).await.unwrap();
        f.listener.on_like(review).await.unwrap();
        let value = f.listener.on_unlike(review).await.unwrap();

        assert_eq!(value, 1);
    }

    #[tokio::test]
    async fn first_adjustment_starts_from_durable_value() {
        let f = fixture();
        let chapter = key(EntityKind::Chapter, 8);
        f.store.put(chapter, CounterField::LikeCount, 10).await;

        let value = f.listener.on_like(chapter).await.unwrap();

        assert_eq!(value, 11);
    }

    #[tokio::test]
    async fn unreadable_store_does_not_fail_the_like() {
        let f = fixture();
        let consult = key(EntityKind::Consult, 7);
        f.store.put(consult, CounterField::LikeCount, 10).await;
        f.store.fail_reads(true);

        let value = f.listener.on_like(consult).await.unwrap();

        assert_eq!(value, 1);
        assert!(f.dirty.contains(consult).await.unwrap());
        assert!(!f.cache.is_seeded(consult, CounterField::LikeCount).await.unwrap());

        f.store.fail_reads(false);
        let value = f.listener.on_like(consult).await.unwrap();

        assert_eq!(value, 12);
        assert!(f.cache.is_seeded(consult, CounterField::LikeCount).await.unwrap());
    }

    #[tokio::test]
    async fn cache_failure_marks_nothing_dirty() {
        let f = fixture();
        f.cache.set_available(false);

        let err = f
            .listener
            .on_like(key(EntityKind::Consult, 5))
            .await
            .unwrap_err();

        assert!(matches!(err, CounterError::CacheUnavailable(_)));
        assert!(f.dirty.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn registered_listener_routes_every_like_event() {
        let f = fixture();
        let bus = InMemoryEventBus::new();
        f.listener.register(&bus);

        for (kind, action, _) in LIKE_EVENT_TYPES {
            let event = LikeToggled::new(key(kind, 1), UserId::new(2).unwrap(), action).unwrap();
            bus.publish(event.to_envelope().unwrap()).await.unwrap();
        }

        for kind in [EntityKind::Consult, EntityKind::Review, EntityKind::Chapter] {
            assert_eq!(
                f.cache.get(key(kind, 1), CounterField::LikeCount).await.unwrap(),
                Some(0)
            );
            assert!(f.dirty.contains(key(kind, 1)).await.unwrap());
        }
    }

    #[tokio::test]
    async fn unknown_event_type_is_rejected() {
        let f = fixture();
        let envelope = EventEnvelope::new("course.liked.v1", "1", "Course", json!({}));

        let err = f.listener.handle(envelope).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn malformed_aggregate_id_is_rejected() {
        let f = fixture();
        let envelope = EventEnvelope::new("consult.liked.v1", "abc", "Consult", json!({}));

        assert!(f.listener.handle(envelope).await.is_err());
        assert!(f.dirty.is_empty().await.unwrap());
    }
}
