//! In-memory course and review readers.
//!
//! Rows are supplied up front through builder methods; the readers then
//! evaluate query plans and lookups over them exactly as the SQL adapters do.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::catalog::{Chapter, Course, CourseAssociation, CourseQueryPlan, Page};
use crate::domain::foundation::{DomainError, EntityId, UserId};
use crate::domain::review::{Review, ReviewLike};
use crate::ports::{CourseReader, ReviewReader};

#[derive(Debug, Clone)]
struct ConsultRow {
    course_id: EntityId,
    published: bool,
}

/// In-memory course reader.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCourseReader {
    courses: Vec<Course>,
    chapters: Vec<Chapter>,
    consults: Vec<ConsultRow>,
    reviews: Vec<Review>,
    categories: HashMap<EntityId, Vec<EntityId>>,
    teachers: HashMap<EntityId, Vec<EntityId>>,
}

impl InMemoryCourseReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    pub fn with_courses(mut self, courses: impl IntoIterator<Item = Course>) -> Self {
        self.courses.extend(courses);
        self
    }

    pub fn with_chapter(mut self, chapter: Chapter) -> Self {
        self.chapters.push(chapter);
        self
    }

    pub fn with_consult(mut self, course_id: EntityId, published: bool) -> Self {
        self.consults.push(ConsultRow {
            course_id,
            published,
        });
        self
    }

    pub fn with_review(mut self, review: Review) -> Self {
        self.reviews.push(review);
        self
    }

    /// Links a course to a category.
    pub fn with_category_course(mut self, category_id: EntityId, course_id: EntityId) -> Self {
        self.categories.entry(category_id).or_default().push(course_id);
        self
    }

    /// Links a course to a teacher.
    pub fn with_teacher_course(mut self, teacher_id: EntityId, course_id: EntityId) -> Self {
        self.teachers.entry(teacher_id).or_default().push(course_id);
        self
    }

    fn course_chapters(&self, course_id: EntityId) -> impl Iterator<Item = &Chapter> {
        self.chapters
            .iter()
            .filter(move |c| c.course_id == course_id && !c.deleted)
    }

    fn published_reviews(&self, course_id: EntityId) -> impl Iterator<Item = &Review> {
        self.reviews
            .iter()
            .filter(move |r| r.course_id == course_id && r.published)
    }
}

fn resolve(links: &HashMap<EntityId, Vec<EntityId>>, keys: &[EntityId]) -> Vec<EntityId> {
    let mut ids: Vec<EntityId> = keys
        .iter()
        .filter_map(|key| links.get(key))
        .flatten()
        .copied()
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

#[async_trait]
impl CourseReader for InMemoryCourseReader {
    async fn fetch_page(&self, plan: &CourseQueryPlan) -> Result<Page<Course>, DomainError> {
        let mut matched: Vec<&Course> = self.courses.iter().filter(|c| plan.matches(c)).collect();
        matched.sort_by(|a, b| plan.order.compare(a, b).then_with(|| b.id.cmp(&a.id)));

        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(plan.page.offset() as usize)
            .take(plan.page.limit as usize)
            .cloned()
            .collect();

        Ok(Page::new(items, total, plan.page))
    }

    async fn course_ids_for(
        &self,
        association: &CourseAssociation,
    ) -> Result<Vec<EntityId>, DomainError> {
        Ok(match association {
            CourseAssociation::Categories(ids) => resolve(&self.categories, ids),
            CourseAssociation::Teachers(ids) => resolve(&self.teachers, ids),
        })
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Course>, DomainError> {
        Ok(self.courses.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Course>, DomainError> {
        Ok(self
            .courses
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn find_chapters(&self, course_id: EntityId) -> Result<Vec<Chapter>, DomainError> {
        let mut chapters: Vec<Chapter> = self.course_chapters(course_id).cloned().collect();
        chapters.sort_by_key(|c| (c.priority, c.id));
        Ok(chapters)
    }

    async fn find_lessons(&self, course_id: EntityId) -> Result<Vec<Chapter>, DomainError> {
        let mut lessons: Vec<Chapter> = self
            .course_chapters(course_id)
            .filter(|c| c.is_lesson())
            .cloned()
            .collect();
        lessons.sort_by_key(|c| (c.priority, c.id));
        Ok(lessons)
    }

    async fn count_lessons(&self, course_id: EntityId) -> Result<u64, DomainError> {
        Ok(self
            .course_chapters(course_id)
            .filter(|c| c.is_lesson())
            .count() as u64)
    }

    async fn count_consults(&self, course_id: EntityId) -> Result<u64, DomainError> {
        Ok(self
            .consults
            .iter()
            .filter(|c| c.course_id == course_id && c.published)
            .count() as u64)
    }

    async fn count_reviews(&self, course_id: EntityId) -> Result<u64, DomainError> {
        Ok(self.published_reviews(course_id).count() as u64)
    }

    async fn average_rating(&self, course_id: EntityId) -> Result<Option<f64>, DomainError> {
        let ratings: Vec<f64> = self
            .published_reviews(course_id)
            .map(|r| r.rating.value() as f64)
            .collect();
        if ratings.is_empty() {
            return Ok(None);
        }
        Ok(Some(ratings.iter().sum::<f64>() / ratings.len() as f64))
    }
}

/// In-memory review reader.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReviewReader {
    reviews: Vec<Review>,
    likes: Vec<ReviewLike>,
}

impl InMemoryReviewReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_review(mut self, review: Review) -> Self {
        self.reviews.push(review);
        self
    }

    pub fn with_like(mut self, like: ReviewLike) -> Self {
        self.likes.push(like);
        self
    }
}

#[async_trait]
impl ReviewReader for InMemoryReviewReader {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Review>, DomainError> {
        Ok(self.reviews.iter().find(|r| r.id == id).cloned())
    }

    async fn find_review(
        &self,
        course_id: EntityId,
        user_id: UserId,
    ) -> Result<Option<Review>, DomainError> {
        Ok(self
            .reviews
            .iter()
            .find(|r| r.course_id == course_id && r.user_id == user_id)
            .cloned())
    }

    async fn find_review_like(
        &self,
        review_id: EntityId,
        user_id: UserId,
    ) -> Result<Option<ReviewLike>, DomainError> {
        Ok(self
            .likes
            .iter()
            .find(|l| l.review_id == review_id && l.user_id == user_id)
            .cloned())
    }
}
