//! Dirty set port - entities whose cached counters await reconciliation.

use async_trait::async_trait;

use crate::domain::counter::{CounterError, CounterKey};

/// Port for the set of keys pending a flush.
///
/// Implementations must guarantee that `claim` is atomic: a key returned by
/// one `claim` call is removed from the set before any other `claim` call can
/// observe it, so two concurrent flushes never process the same key.
#[async_trait]
pub trait DirtySet: Send + Sync {
    /// Marks a key dirty. Adding an already-dirty key is a no-op.
    async fn add(&self, key: CounterKey) -> Result<(), CounterError>;

    /// Atomically removes and returns up to `max` keys.
    ///
    /// Selection order is unspecified, but repeated calls drain the set.
    async fn claim(&self, max: usize) -> Result<Vec<CounterKey>, CounterError>;

    /// Returns true if the key is currently dirty.
    async fn contains(&self, key: CounterKey) -> Result<bool, CounterError>;

    /// Number of dirty keys.
    async fn len(&self) -> Result<usize, CounterError>;

    async fn is_empty(&self) -> Result<bool, CounterError> {
        Ok(self.len().await? == 0)
    }
}
