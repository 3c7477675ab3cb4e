//! Counter store port - the durable side of the counters.

use async_trait::async_trait;

use crate::domain::counter::{CounterError, CounterField, CounterKey, EntityKind};
use crate::domain::foundation::EntityId;

/// Port for reading and overwriting durable counter columns.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Reads one durable counter column. `None` if the row does not exist.
    async fn read_counter(
        &self,
        key: CounterKey,
        field: CounterField,
    ) -> Result<Option<i64>, CounterError>;

    /// Overwrites the given counter columns of one row.
    ///
    /// Values are absolute, not deltas; writing the same values twice is safe.
    async fn write_counters(
        &self,
        key: CounterKey,
        values: &[(CounterField, i64)],
    ) -> Result<(), CounterError>;

    /// Highest id assigned for the entity kind, if any row exists.
    async fn max_id(&self, kind: EntityKind) -> Result<Option<EntityId>, CounterError>;
}
