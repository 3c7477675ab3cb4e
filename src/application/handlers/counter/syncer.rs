//! CounterSyncer - Reconciles cached counters into the durable store.
//!
//! The listener marks keys dirty after every cache mutation; this service
//! claims dirty keys in bounded batches, snapshots their cached fields and
//! overwrites the durable columns.
//!
//! ## Delivery Guarantees
//!
//! - A claimed key is removed from the dirty set before it is processed.
//! - A key can be re-marked while its write is still running. Flushes of one
//!   syncer share an in-flight set; a flush that claims a key already in
//!   flight puts it back in the dirty set instead of writing it, so an older
//!   snapshot can never land after a newer one.
//! - A key whose write fails is re-marked dirty and retried on a later flush.
//! - Unseeded fields get their durable baseline folded in before the write.
//! - Writes are absolute values, so replaying a flush is harmless.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `poll_interval` | 1s | How often the run loop flushes |
//! | `batch_size` | 100 | Max keys claimed per flush |

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::domain::counter::{CounterError, CounterKey};
use crate::ports::{CounterCache, CounterSnapshot, CounterStore, DirtySet};

/// Configuration for the CounterSyncer run loop.
#[derive(Debug, Clone)]
pub struct CounterSyncerConfig {
    /// How often to flush.
    pub poll_interval: Duration,

    /// Maximum keys to claim per flush.
    pub batch_size: usize,
}

impl Default for CounterSyncerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1000),
            batch_size: 100,
        }
    }
}

impl CounterSyncerConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }
}

/// Outcome of a single flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Keys removed from the dirty set.
    pub claimed: usize,
    /// Keys whose cached values reached the durable store.
    pub synced: usize,
    /// Keys that failed and were re-marked dirty.
    pub failed: usize,
    /// Keys already being written by another flush, re-marked dirty.
    pub deferred: usize,
}

type InFlight = Mutex<HashSet<CounterKey>>;

/// Holds a key in the in-flight set until dropped.
struct InFlightGuard<'a> {
    keys: &'a InFlight,
    key: CounterKey,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(keys: &'a InFlight, key: CounterKey) -> Option<Self> {
        let inserted = keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key);
        if inserted {
            Some(Self { keys, key })
        } else {
            None
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

/// Background service that flushes dirty counters to the durable store.
pub struct CounterSyncer {
    cache: Arc<dyn CounterCache>,
    dirty: Arc<dyn DirtySet>,
    store: Arc<dyn CounterStore>,
    config: CounterSyncerConfig,
    in_flight: InFlight,
    synced_total: AtomicU64,
    failures_total: AtomicU64,
}

impl CounterSyncer {
    pub fn new(
        cache: Arc<dyn CounterCache>,
        dirty: Arc<dyn DirtySet>,
        store: Arc<dyn CounterStore>,
    ) -> Self {
        Self::with_config(cache, dirty, store, CounterSyncerConfig::default())
    }

    pub fn with_config(
        cache: Arc<dyn CounterCache>,
        dirty: Arc<dyn DirtySet>,
        store: Arc<dyn CounterStore>,
        config: CounterSyncerConfig,
    ) -> Self {
        Self {
            cache,
            dirty,
            store,
            config,
            in_flight: Mutex::new(HashSet::new()),
            synced_total: AtomicU64::new(0),
            failures_total: AtomicU64::new(0),
        }
    }

    /// Marks a key as needing reconciliation. Idempotent.
    pub async fn add_item(&self, key: CounterKey) -> Result<(), CounterError> {
        self.dirty.add(key).await
    }

    /// Claims up to `max_batch` dirty keys and writes their cached values.
    ///
    /// Per-key failures never abort the batch; they are counted, logged and
    /// re-queued. Only a failure to claim at all is returned as an error.
    pub async fn flush(&self, max_batch: usize) -> Result<FlushReport, CounterError> {
        let keys = self.dirty.claim(max_batch).await?;
        let mut report = FlushReport {
            claimed: keys.len(),
            ..FlushReport::default()
        };

        for key in keys {
            // released only after the write or the re-queue below
            let Some(_guard) = InFlightGuard::acquire(&self.in_flight, key) else {
                report.deferred += 1;
                tracing::debug!(key = %key, "Counter key already in flight, deferring");
                self.requeue(key).await;
                continue;
            };

            match self.sync_key(key).await {
                Ok(()) => report.synced += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(key = %key, error = %e, "Counter sync failed, re-queueing");
                    self.requeue(key).await;
                }
            }
        }

        self.synced_total
            .fetch_add(report.synced as u64, Ordering::Relaxed);
        self.failures_total
            .fetch_add(report.failed as u64, Ordering::Relaxed);

        if report.claimed > 0 {
            tracing::debug!(
                claimed = report.claimed,
                synced = report.synced,
                failed = report.failed,
                deferred = report.deferred,
                "Counter flush complete"
            );
        }

        Ok(report)
    }

    async fn requeue(&self, key: CounterKey) {
        if let Err(e) = self.dirty.add(key).await {
            tracing::error!(
                key = %key,
                error = %e,
                "Failed to re-queue counter key; pending delta stays in cache"
            );
        }
    }

    async fn sync_key(&self, key: CounterKey) -> Result<(), CounterError> {
        let mut snapshot = self.cache.snapshot(key).await?;
        if snapshot.is_empty() {
            return Ok(());
        }

        if self.fold_baselines(key, &snapshot).await? {
            snapshot = self.cache.snapshot(key).await?;
        }

        let values: Vec<_> = snapshot.into_iter().collect();
        self.store.write_counters(key, &values).await
    }

    /// Folds the durable value into every unseeded field of the snapshot.
    ///
    /// Returns true if any field was unseeded when the snapshot was taken,
    /// whether this call or a concurrent listener folded it in.
    async fn fold_baselines(
        &self,
        key: CounterKey,
        snapshot: &CounterSnapshot,
    ) -> Result<bool, CounterError> {
        let mut stale = false;
        for &field in snapshot.keys() {
            if self.cache.is_seeded(key, field).await? {
                continue;
            }
            stale = true;
            let durable = self.store.read_counter(key, field).await?.unwrap_or(0);
            if let Some(value) = self.cache.apply_baseline(key, field, durable).await? {
                tracing::debug!(key = %key, field = %field.as_str(), durable, value, "Folded durable baseline");
            }
        }
        Ok(stale)
    }

    /// Flush with the configured batch size.
    pub async fn flush_once(&self) -> Result<FlushReport, CounterError> {
        self.flush(self.config.batch_size).await
    }

    /// Run the flush loop until shutdown signal is received.
    ///
    /// A flush error is logged and the loop keeps going; the next tick
    /// retries. One final flush runs before returning.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.poll_interval);

        tracing::info!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            batch_size = self.config.batch_size,
            "Counter syncer started"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        self.log_flush(self.flush_once().await);
                        tracing::info!("Counter syncer stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.log_flush(self.flush_once().await);
                }
            }
        }
    }

    fn log_flush(&self, result: Result<FlushReport, CounterError>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "Counter flush could not claim dirty keys");
        }
    }

    /// Number of keys currently awaiting a flush.
    pub async fn pending(&self) -> Result<usize, CounterError> {
        self.dirty.len().await
    }

    /// Cumulative per-key sync failures since start.
    pub fn failure_count(&self) -> u64 {
        self.failures_total.load(Ordering::Relaxed)
    }

    /// Cumulative successfully synced keys since start.
    pub fn synced_count(&self) -> u64 {
        self.synced_total.load(Ordering::Relaxed)
    }
}
