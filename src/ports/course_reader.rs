//! Course reader port (read side / catalog queries).
//!
//! Defines the contract for course listings, association lookups and the
//! aggregate counts shown on a course page.

use async_trait::async_trait;

use crate::domain::catalog::{Chapter, Course, CourseAssociation, CourseQueryPlan, Page};
use crate::domain::foundation::{DomainError, EntityId};

/// Reader port for course queries.
#[async_trait]
pub trait CourseReader: Send + Sync {
    /// Executes a composed listing plan.
    async fn fetch_page(&self, plan: &CourseQueryPlan) -> Result<Page<Course>, DomainError>;

    /// Resolves category or teacher ids to the ids of associated courses.
    async fn course_ids_for(
        &self,
        association: &CourseAssociation,
    ) -> Result<Vec<EntityId>, DomainError>;

    /// Get a course by ID. Returns `None` if not found.
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Course>, DomainError>;

    /// Get several courses by ID; missing ids are skipped.
    async fn find_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Course>, DomainError>;

    /// Non-deleted chapters and lessons of a course.
    async fn find_chapters(&self, course_id: EntityId) -> Result<Vec<Chapter>, DomainError>;

    /// Non-deleted lessons (chapters with a parent) of a course.
    async fn find_lessons(&self, course_id: EntityId) -> Result<Vec<Chapter>, DomainError>;

    async fn count_lessons(&self, course_id: EntityId) -> Result<u64, DomainError>;

    /// Published consults of a course.
    async fn count_consults(&self, course_id: EntityId) -> Result<u64, DomainError>;

    /// Published reviews of a course.
    async fn count_reviews(&self, course_id: EntityId) -> Result<u64, DomainError>;

    /// Mean rating of published reviews; `None` when there are none.
    async fn average_rating(&self, course_id: EntityId) -> Result<Option<f64>, DomainError>;
}
