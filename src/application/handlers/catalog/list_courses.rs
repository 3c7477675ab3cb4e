//! ListCoursesHandler - Query handler for paginated course listings.
//!
//! Resolves a category or teacher filter to course ids, composes the pure
//! query plan and hands it to the reader. An association that matches no
//! course short-circuits to an empty page without touching the course table.

use std::sync::Arc;

use crate::domain::catalog::{
    compose, ComposedQuery, Course, CourseFilter, CourseSort, Page, PageRequest,
    DEFAULT_PAGE_LIMIT,
};
use crate::domain::foundation::DomainError;
use crate::ports::CourseReader;

/// Query to list courses.
#[derive(Debug, Clone, Default)]
pub struct ListCoursesQuery {
    pub filter: CourseFilter,
    /// Raw sort name; unknown or missing means latest first.
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListCoursesQuery {
    pub fn new(filter: CourseFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn sorted_by(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn paginated(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    fn sort(&self) -> CourseSort {
        self.sort.as_deref().map(CourseSort::parse).unwrap_or_default()
    }

    fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        )
    }
}

/// Handler for course listings.
pub struct ListCoursesHandler {
    reader: Arc<dyn CourseReader>,
}

impl ListCoursesHandler {
    pub fn new(reader: Arc<dyn CourseReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: ListCoursesQuery) -> Result<Page<Course>, DomainError> {
        let resolved = match query.filter.association() {
            Some(association) => Some(self.reader.course_ids_for(&association).await?),
            None => None,
        };

        match compose(&query.filter, resolved, query.sort(), query.page_request()) {
            ComposedQuery::Empty(page) => {
                tracing::debug!("Course association resolved to no courses");
                Ok(Page::empty(page))
            }
            ComposedQuery::Plan(plan) => self.reader.fetch_page(&plan).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryCourseReader;
    use crate::domain::catalog::{CourseLevel, CourseModel};
    use crate::domain::foundation::EntityId;

    fn id(value: i64) -> EntityId {
        EntityId::new(value).unwrap()
    }

    fn course(value: i64, title: &str, market_price: i64, vip_price: i64) -> Course {
        Course {
            id: id(value),
            title: title.to_string(),
            model: CourseModel::Vod,
            level: CourseLevel::Junior,
            market_price,
            vip_price,
            score: value as f64,
            rating: 5.0 - value as f64,
            user_count: 0,
            lesson_count: 0,
            published: true,
            deleted: false,
        }
    }

    fn handler() -> ListCoursesHandler {
        let reader = InMemoryCourseReader::new()
            .with_course(course(1, "Rust Basics", 0, 0))
            .with_course(course(2, "Async Rust", 9900, 4900))
            .with_course(course(3, "Go Tour", 5000, 0))
            .with_course(course(4, "Advanced Rust", 19900, 19900))
            .with_category_course(id(10), id(1))
            .with_category_course(id(10), id(2))
            .with_teacher_course(id(20), id(3));
        ListCoursesHandler::new(Arc::new(reader))
    }

    fn ids(page: &Page<Course>) -> Vec<i64> {
        page.items.iter().map(|c| c.id.value()).collect()
    }

    #[tokio::test]
    async fn default_listing_is_latest_first() {
        let page = handler().handle(ListCoursesQuery::default()).await.unwrap();

        assert_eq!(ids(&page), vec![4, 3, 2, 1]);
        assert_eq!(page.limit, 15);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn category_with_no_courses_yields_empty_page() {
        let query = ListCoursesQuery::new(CourseFilter::default().with_category(id(99)));

        let page = handler().handle(query).await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn category_wins_over_teacher() {
        let filter = CourseFilter::default()
            .with_category(id(10))
            .with_teacher(id(20));

        let page = handler().handle(ListCoursesQuery::new(filter)).await.unwrap();

        assert_eq!(ids(&page), vec![2, 1]);
    }

    #[tokio::test]
    async fn sort_modes_filter_prices() {
        let handler = handler();

        let free = handler
            .handle(ListCoursesQuery::default().sorted_by("free"))
            .await
            .unwrap();
        let vip = handler
            .handle(ListCoursesQuery::default().sorted_by("vip"))
            .await
            .unwrap();
        let vip_free = handler
            .handle(ListCoursesQuery::default().sorted_by("vip_free"))
            .await
            .unwrap();

        assert_eq!(ids(&free), vec![1]);
        assert_eq!(ids(&vip), vec![3, 2]);
        assert_eq!(ids(&vip_free), vec![3, 1]);
    }

    #[tokio::test]
    async fn unknown_sort_falls_back_to_latest() {
        let page = handler()
            .handle(ListCoursesQuery::default().sorted_by("cheapest"))
            .await
            .unwrap();

        assert_eq!(ids(&page), vec![4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn title_filter_is_case_insensitive() {
        let query = ListCoursesQuery::new(CourseFilter::default().with_title("rust"))
            .sorted_by("score");

        let page = handler().handle(query).await.unwrap();

        assert_eq!(ids(&page), vec![4, 2, 1]);
    }

    #[tokio::test]
    async fn pagination_is_normalised() {
        let query = ListCoursesQuery::default().paginated(0, 2);

        let page = handler().handle(query).await.unwrap();

        assert_eq!(page.page, 1);
        assert_eq!(ids(&page), vec![4, 3]);
        assert!(page.has_more);
    }
}
