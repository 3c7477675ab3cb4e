//! GetCourseStatsHandler - Aggregate counts shown on a course page.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{DomainError, EntityId, ErrorCode};
use crate::ports::CourseReader;

/// Aggregates for one course, computed from published rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseStats {
    pub course_id: EntityId,
    pub lesson_count: u64,
    pub consult_count: u64,
    pub review_count: u64,
    /// Mean of published review ratings, `None` with no reviews.
    pub average_rating: Option<f64>,
}

pub struct GetCourseStatsHandler {
    reader: Arc<dyn CourseReader>,
}

impl GetCourseStatsHandler {
    pub fn new(reader: Arc<dyn CourseReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, course_id: EntityId) -> Result<CourseStats, DomainError> {
        if self.reader.find_by_id(course_id).await?.is_none() {
            return Err(DomainError::new(ErrorCode::CourseNotFound, "course.not_found")
                .with_detail("course_id", course_id.to_string()));
        }

        Ok(CourseStats {
            course_id,
            lesson_count: self.reader.count_lessons(course_id).await?,
            consult_count: self.reader.count_consults(course_id).await?,
            review_count: self.reader.count_reviews(course_id).await?,
            average_rating: self.reader.average_rating(course_id).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryCourseReader;
    use crate::domain::catalog::{Course, CourseLevel, CourseModel, NewChapter};
    use crate::domain::foundation::{Timestamp, UserId};
    use crate::domain::review::{Review, ReviewRating};

    fn id(value: i64) -> EntityId {
        EntityId::new(value).unwrap()
    }

    fn course() -> Course {
        Course {
            id: id(1),
            title: "Rust Basics".to_string(),
            model: CourseModel::Read,
            level: CourseLevel::Entry,
            market_price: 0,
            vip_price: 0,
            score: 0.0,
            rating: 0.0,
            user_count: 0,
            lesson_count: 0,
            published: true,
            deleted: false,
        }
    }

    fn review(value: i64, stars: i64) -> Review {
        Review {
            id: id(value),
            course_id: id(1),
            user_id: UserId::new(value).unwrap(),
            content: "worth it".to_string(),
            rating: ReviewRating::try_from_i64(stars).unwrap(),
            like_count: 0,
            published: true,
            created_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn stats_bundle_counts() {
        let chapter = NewChapter {
            course_id: id(1),
            parent_id: None,
            title: "Getting started".to_string(),
            priority: 1,
            free: true,
        };
        let lesson = NewChapter {
            parent_id: Some(id(10)),
            title: "Install".to_string(),
            ..chapter.clone()
        };
        let reader = InMemoryCourseReader::new()
            .with_course(course())
            .with_chapter(chapter.into_chapter(id(10), CourseModel::Read))
            .with_chapter(lesson.into_chapter(id(11), CourseModel::Read))
            .with_consult(id(1), true)
            .with_review(review(1, 4))
            .with_review(review(2, 5));

        let stats = GetCourseStatsHandler::new(Arc::new(reader))
            .handle(id(1))
            .await
            .unwrap();

        assert_eq!(stats.lesson_count, 1);
        assert_eq!(stats.consult_count, 1);
        assert_eq!(stats.review_count, 2);
        assert_eq!(stats.average_rating, Some(4.5));
    }

    #[tokio::test]
    async fn missing_course_is_not_found() {
        let handler = GetCourseStatsHandler::new(Arc::new(InMemoryCourseReader::new()));

        let err = handler.handle(id(5)).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::CourseNotFound);
        assert_eq!(err.message, "course.not_found");
    }
}
