//! In-memory durable counter store.
//!
//! Stands in for the relational store in tests. Writes and reads can be made
//! to fail independently with [`InMemoryCounterStore::fail_writes`] and
//! [`InMemoryCounterStore::fail_reads`] to exercise the retry paths.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::counter::{CounterError, CounterField, CounterKey, EntityKind};
use crate::domain::foundation::EntityId;
use crate::ports::CounterStore;

type Row = BTreeMap<CounterField, i64>;

/// In-memory rows keyed by (kind, id).
#[derive(Debug, Clone, Default)]
pub struct InMemoryCounterStore {
    rows: Arc<RwLock<HashMap<CounterKey, Row>>>,
    failing_writes: Arc<AtomicBool>,
    failing_reads: Arc<AtomicBool>,
    writes: Arc<AtomicU64>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a row (if missing) and sets one of its counters.
    pub async fn put(&self, key: CounterKey, field: CounterField, value: i64) {
        self.rows
            .write()
            .await
            .entry(key)
            .or_default()
            .insert(field, value);
    }

    /// Inserts an empty row, as if the entity was just created.
    pub async fn insert_row(&self, key: CounterKey) {
        self.rows.write().await.entry(key).or_default();
    }

    /// Current value of a counter column, if the row and column exist.
    pub async fn value(&self, key: CounterKey, field: CounterField) -> Option<i64> {
        self.rows
            .read()
            .await
            .get(&key)
            .and_then(|row| row.get(&field))
            .copied()
    }

    /// Makes subsequent writes fail (or succeed again).
    pub fn fail_writes(&self, failing: bool) {
        self.failing_writes.store(failing, Ordering::SeqCst);
    }

    /// Makes subsequent `read_counter` calls fail (or succeed again).
    pub fn fail_reads(&self, failing: bool) {
        self.failing_reads.store(failing, Ordering::SeqCst);
    }

    /// Number of successful `write_counters` calls.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn read_counter(
        &self,
        key: CounterKey,
        field: CounterField,
    ) -> Result<Option<i64>, CounterError> {
        if self.failing_reads.load(Ordering::SeqCst) {
            return Err(CounterError::store_read(format!("read of {} rejected", key)));
        }
        Ok(self.value(key, field).await)
    }

    async fn write_counters(
        &self,
        key: CounterKey,
        values: &[(CounterField, i64)],
    ) -> Result<(), CounterError> {
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(CounterError::store(format!("write to {} rejected", key)));
        }

        let mut rows = self.rows.write().await;
        let row = rows.entry(key).or_default();
        for (field, value) in values {
            row.insert(*field, *value);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn max_id(&self, kind: EntityKind) -> Result<Option<EntityId>, CounterError> {
        let rows = self.rows.read().await;
        Ok(rows.keys().filter(|key| key.kind == kind).map(|key| key.id).max())
    }
}
