//! Review reader port - lookups backing the review validator.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EntityId, UserId};
use crate::domain::review::{Review, ReviewLike};

#[async_trait]
pub trait ReviewReader: Send + Sync {
    /// Get a review by ID. Returns `None` if not found.
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Review>, DomainError>;

    /// The review a user left on a course, if any.
    async fn find_review(
        &self,
        course_id: EntityId,
        user_id: UserId,
    ) -> Result<Option<Review>, DomainError>;

    /// A user's like on a review, if any.
    async fn find_review_like(
        &self,
        review_id: EntityId,
        user_id: UserId,
    ) -> Result<Option<ReviewLike>, DomainError>;
}
