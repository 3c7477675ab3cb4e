//! ReviewValidator - Input and state checks for review commands.
//!
//! Each check returns the validated value or a [`DomainError`] whose message
//! is a stable key such as `review.content_too_short`.

use std::sync::Arc;

use crate::domain::catalog::Course;
use crate::domain::foundation::{DomainError, EntityId, ErrorCode, Timestamp, UserId};
use crate::domain::review::{Review, ReviewRating};
use crate::ports::{CourseReader, ReviewReader};

pub const MIN_CONTENT_CHARS: usize = 5;
pub const MAX_CONTENT_CHARS: usize = 255;

/// Age after which an existing like blocks liking again.
pub const LIKE_WINDOW_SECS: i64 = 86_400;

pub struct ReviewValidator {
    reviews: Arc<dyn ReviewReader>,
    courses: Arc<dyn CourseReader>,
}

impl ReviewValidator {
    pub fn new(reviews: Arc<dyn ReviewReader>, courses: Arc<dyn CourseReader>) -> Self {
        Self { reviews, courses }
    }

    pub async fn check_review(&self, id: EntityId) -> Result<Review, DomainError> {
        self.reviews.find_by_id(id).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::ReviewNotFound, "review.not_found")
                .with_detail("review_id", id.to_string())
        })
    }

    pub async fn check_course(&self, id: EntityId) -> Result<Course, DomainError> {
        self.courses.find_by_id(id).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::CourseNotFound, "course.not_found")
                .with_detail("course_id", id.to_string())
        })
    }

    /// Trims the content and checks its length in characters.
    pub fn check_content(&self, content: &str) -> Result<String, DomainError> {
        let value = content.trim();
        let length = value.chars().count();

        if length < MIN_CONTENT_CHARS {
            return Err(DomainError::validation("content", "review.content_too_short"));
        }
        if length > MAX_CONTENT_CHARS {
            return Err(DomainError::validation("content", "review.content_too_long"));
        }
        Ok(value.to_string())
    }

    pub fn check_rating(&self, rating: i64) -> Result<ReviewRating, DomainError> {
        ReviewRating::try_from_i64(rating)
            .map_err(|_| DomainError::validation("rating", "review.invalid_rating"))
    }

    /// Accepts 0 (hidden) or 1 (published).
    pub fn check_publish_status(&self, status: i64) -> Result<bool, DomainError> {
        match status {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(DomainError::validation(
                "published",
                "review.invalid_publish_status",
            )),
        }
    }

    pub async fn check_if_reviewed(
        &self,
        course_id: EntityId,
        user_id: UserId,
    ) -> Result<(), DomainError> {
        if self.reviews.find_review(course_id, user_id).await?.is_some() {
            return Err(DomainError::new(ErrorCode::AlreadyReviewed, "review.has_reviewed")
                .with_detail("course_id", course_id.to_string())
                .with_detail("user_id", user_id.to_string()));
        }
        Ok(())
    }

    /// Rejects only when the existing like is older than [`LIKE_WINDOW_SECS`].
    pub async fn check_if_liked(
        &self,
        review_id: EntityId,
        user_id: UserId,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let Some(like) = self.reviews.find_review_like(review_id, user_id).await? else {
            return Ok(());
        };

        if now.duration_since(&like.created_at).num_seconds() > LIKE_WINDOW_SECS {
            return Err(DomainError::new(ErrorCode::AlreadyLiked, "review.has_liked")
                .with_detail("review_id", review_id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::{InMemoryCourseReader, InMemoryReviewReader};
    use crate::domain::review::ReviewLike;

    fn id(value: i64) -> EntityId {
        EntityId::new(value).unwrap()
    }

    fn user(value: i64) -> UserId {
        UserId::new(value).unwrap()
    }

    fn review() -> Review {
        Review {
            id: id(1),
            course_id: id(2),
            user_id: user(3),
            content: "clear and practical".to_string(),
            rating: ReviewRating::FourStars,
            like_count: 0,
            published: true,
            created_at: Timestamp::from_unix_secs(1_000),
        }
    }

    fn validator(reviews: InMemoryReviewReader) -> ReviewValidator {
        ReviewValidator::new(Arc::new(reviews), Arc::new(InMemoryCourseReader::new()))
    }

    fn liked_at(secs: u64) -> ReviewValidator {
        validator(InMemoryReviewReader::new().with_like(ReviewLike {
            review_id: id(1),
            user_id: user(3),
            created_at: Timestamp::from_unix_secs(secs),
        }))
    }

    #[tokio::test]
    async fn missing_review_and_course_are_not_found() {
        let validator = validator(InMemoryReviewReader::new());

        let review_err = validator.check_review(id(9)).await.unwrap_err();
        let course_err = validator.check_course(id(9)).await.unwrap_err();

        assert_eq!(review_err.code, ErrorCode::ReviewNotFound);
        assert_eq!(review_err.message, "review.not_found");
        assert_eq!(course_err.code, ErrorCode::CourseNotFound);
    }

    #[tokio::test]
    async fn existing_review_is_returned() {
        let validator = validator(InMemoryReviewReader::new().with_review(review()));

        assert_eq!(validator.check_review(id(1)).await.unwrap(), review());
    }

    #[test]
    fn content_length_boundaries_use_trimmed_chars() {
        let validator = validator(InMemoryReviewReader::new());

        assert_eq!(validator.check_content("  hello  ").unwrap(), "hello");
        assert_eq!(
            validator.check_content(" four ").unwrap_err().message,
            "review.content_too_short"
        );
        assert!(validator.check_content(&"é".repeat(255)).is_ok());
        assert_eq!(
            validator.check_content(&"a".repeat(256)).unwrap_err().message,
            "review.content_too_long"
        );
    }

    #[test]
    fn rating_must_be_one_to_five() {
        let validator = validator(InMemoryReviewReader::new());

        assert_eq!(validator.check_rating(5).unwrap(), ReviewRating::FiveStars);
        for bad in [0, 6, -1] {
            let err = validator.check_rating(bad).unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationFailed);
            assert_eq!(err.message, "review.invalid_rating");
        }
    }

    #[test]
    fn publish_status_is_zero_or_one() {
        let validator = validator(InMemoryReviewReader::new());

        assert!(!validator.check_publish_status(0).unwrap());
        assert!(validator.check_publish_status(1).unwrap());
        assert_eq!(
            validator.check_publish_status(2).unwrap_err().message,
            "review.invalid_publish_status"
        );
    }

    #[tokio::test]
    async fn second_review_by_same_user_is_rejected() {
        let validator = validator(InMemoryReviewReader::new().with_review(review()));

        let err = validator.check_if_reviewed(id(2), user(3)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyReviewed);
        assert!(validator.check_if_reviewed(id(2), user(4)).await.is_ok());
    }

    #[tokio::test]
    async fn like_blocks_only_after_window() {
        let validator = liked_at(1_000);

        let fresh = Timestamp::from_unix_secs(1_000 + 86_400);
        let stale = Timestamp::from_unix_secs(1_000 + 86_401);

        assert!(validator.check_if_liked(id(1), user(3), fresh).await.is_ok());
        let err = validator
            .check_if_liked(id(1), user(3), stale)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyLiked);
        assert_eq!(err.message, "review.has_liked");
    }

    #[tokio::test]
    async fn no_like_record_passes() {
        let validator = validator(InMemoryReviewReader::new());

        assert!(validator
            .check_if_liked(id(1), user(3), Timestamp::now())
            .await
            .is_ok());
    }
}
