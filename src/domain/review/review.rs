//! Review and review-like records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EntityId, Timestamp, UserId};

use super::ReviewRating;

/// A course review row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: EntityId,
    pub course_id: EntityId,
    pub user_id: UserId,
    pub content: String,
    pub rating: ReviewRating,
    pub like_count: i64,
    pub published: bool,
    pub created_at: Timestamp,
}

/// A user's like on a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewLike {
    pub review_id: EntityId,
    pub user_id: UserId,
    pub created_at: Timestamp,
}
