//! PostgreSQL implementation of ReviewReader.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, EntityId, ErrorCode, Timestamp, UserId};
use crate::domain::review::{Review, ReviewLike, ReviewRating};
use crate::ports::ReviewReader;

const REVIEW_COLUMNS: &str =
    "id, course_id, user_id, content, rating, like_count, published, created_at";

#[derive(Clone)]
pub struct PostgresReviewReader {
    pool: PgPool,
}

impl PostgresReviewReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_review(
        &self,
        sql: &str,
        first: i64,
        second: Option<i64>,
    ) -> Result<Option<Review>, DomainError> {
        let mut query = sqlx::query_as::<_, ReviewRow>(sql).bind(first);
        if let Some(second) = second {
            query = query.bind(second);
        }

        let row = query.fetch_optional(&self.pool).await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch review: {}", e),
            )
        })?;

        row.map(Review::try_from).transpose()
    }
}

impl std::fmt::Debug for PostgresReviewReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresReviewReader")
            .field("pool", &"PgPool")
            .finish()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    course_id: i64,
    user_id: i64,
    content: String,
    rating: i32,
    like_count: i64,
    published: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = DomainError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        Ok(Review {
            id: EntityId::new(row.id)?,
            course_id: EntityId::new(row.course_id)?,
            user_id: UserId::new(row.user_id)?,
            content: row.content,
            rating: ReviewRating::try_from_i64(row.rating as i64)?,
            like_count: row.like_count,
            published: row.published,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReviewLikeRow {
    review_id: i64,
    user_id: i64,
    created_at: chrono::DateTime<chrono::Utc>,
}

#[async_trait]
impl ReviewReader for PostgresReviewReader {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Review>, DomainError> {
        let sql = format!("SELECT {} FROM reviews WHERE id = $1", REVIEW_COLUMNS);
        self.fetch_review(&sql, id.value(), None).await
    }

    async fn find_review(
        &self,
        course_id: EntityId,
        user_id: UserId,
    ) -> Result<Option<Review>, DomainError> {
        let sql = format!(
            "SELECT {} FROM reviews WHERE course_id = $1 AND user_id = $2 LIMIT 1",
            REVIEW_COLUMNS
        );
        self.fetch_review(&sql, course_id.value(), Some(user_id.value()))
            .await
    }

    async fn find_review_like(
        &self,
        review_id: EntityId,
        user_id: UserId,
    ) -> Result<Option<ReviewLike>, DomainError> {
        let row: Option<ReviewLikeRow> = sqlx::query_as(
            "SELECT review_id, user_id, created_at FROM review_likes \
             WHERE review_id = $1 AND user_id = $2",
        )
        .bind(review_id.value())
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch review like: {}", e),
            )
        })?;

        row.map(|row| -> Result<ReviewLike, DomainError> {
            Ok(ReviewLike {
                review_id: EntityId::new(row.review_id)?,
                user_id: UserId::new(row.user_id)?,
                created_at: Timestamp::from_datetime(row.created_at),
            })
        })
        .transpose()
    }
}
