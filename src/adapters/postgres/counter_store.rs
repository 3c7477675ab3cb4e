//! PostgreSQL implementation of CounterStore.
//!
//! Counter columns share their names with [`CounterField::as_str`] and live
//! on the entity's own table. Both identifiers come from closed enums, so
//! they are pushed into the SQL text; values are always bound.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::counter::{CounterError, CounterField, CounterKey, EntityKind};
use crate::domain::foundation::EntityId;
use crate::ports::CounterStore;

/// Table holding rows of the given kind.
pub(crate) fn table_for(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Course => "courses",
        EntityKind::Chapter => "chapters",
        EntityKind::Consult => "consults",
        EntityKind::Review => "reviews",
    }
}

/// PostgreSQL implementation of the CounterStore port.
#[derive(Clone)]
pub struct PostgresCounterStore {
    pool: PgPool,
}

impl PostgresCounterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl std::fmt::Debug for PostgresCounterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresCounterStore")
            .field("pool", &"PgPool")
            .finish()
    }
}

/// Builds `UPDATE <table> SET a = $1, b = $2 WHERE id = $3`.
fn build_update(key: CounterKey, values: &[(CounterField, i64)]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE ");
    qb.push(table_for(key.kind));
    qb.push(" SET ");
    for (i, (field, value)) in values.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(field.as_str());
        qb.push(" = ");
        qb.push_bind(*value);
    }
    qb.push(" WHERE id = ");
    qb.push_bind(key.id.value());
    qb
}

#[async_trait]
impl CounterStore for PostgresCounterStore {
    async fn read_counter(
        &self,
        key: CounterKey,
        field: CounterField,
    ) -> Result<Option<i64>, CounterError> {
        let sql = format!(
            "SELECT {}::BIGINT FROM {} WHERE id = $1",
            field.as_str(),
            table_for(key.kind)
        );

        sqlx::query_scalar::<_, i64>(&sql)
            .bind(key.id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(CounterError::store_read)
    }

    async fn write_counters(
        &self,
        key: CounterKey,
        values: &[(CounterField, i64)],
    ) -> Result<(), CounterError> {
        if values.is_empty() {
            return Ok(());
        }

        let result = build_update(key, values)
            .build()
            .execute(&self.pool)
            .await
            .map_err(CounterError::store)?;

        if result.rows_affected() == 0 {
            tracing::debug!(key = %key, "Counter write matched no row");
        }

        Ok(())
    }

    async fn max_id(&self, kind: EntityKind) -> Result<Option<EntityId>, CounterError> {
        let sql = format!("SELECT MAX(id)::BIGINT FROM {}", table_for(kind));

        let max: Option<i64> = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(CounterError::store_read)?;

        max.map(EntityId::new)
            .transpose()
            .map_err(CounterError::store_read)
    }
}
