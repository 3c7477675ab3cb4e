//! Integration tests for course listings and course statistics.

use std::sync::Arc;

use learnhub::adapters::InMemoryCourseReader;
use learnhub::application::{GetCourseStatsHandler, ListCoursesHandler, ListCoursesQuery};
use learnhub::domain::catalog::{Course, CourseFilter, CourseLevel, CourseModel, Page};
use learnhub::domain::foundation::{EntityId, ErrorCode};

fn id(value: i64) -> EntityId {
    EntityId::new(value).unwrap()
}

fn course(value: i64, market_price: i64, vip_price: i64) -> Course {
    Course {
        id: id(value),
        title: format!("Course {}", value),
        model: if value % 2 == 0 { CourseModel::Live } else { CourseModel::Vod },
        level: CourseLevel::Medium,
        market_price,
        vip_price,
        score: 0.0,
        rating: 0.0,
        user_count: value * 10,
        lesson_count: 0,
        published: value != 6,
        deleted: false,
    }
}

fn catalog() -> Arc<InMemoryCourseReader> {
    Arc::new(
        InMemoryCourseReader::new()
            .with_courses((1..=6).map(|n| course(n, if n % 3 == 0 { 0 } else { n * 1000 }, 0)))
            .with_category_course(id(100), id(2))
            .with_category_course(id(100), id(4)),
    )
}

fn ids(page: &Page<Course>) -> Vec<i64> {
    page.items.iter().map(|c| c.id.value()).collect()
}

#[tokio::test]
async fn category_without_courses_is_empty_not_unfiltered() {
    let handler = ListCoursesHandler::new(catalog());
    let query = ListCoursesQuery::new(CourseFilter::default().with_category(id(555)));

    let page = handler.handle(query).await.unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
    assert!(!page.has_more);
}

#[tokio::test]
async fn latest_orders_by_descending_id() {
    let handler = ListCoursesHandler::new(catalog());

    let page = handler.handle(ListCoursesQuery::default()).await.unwrap();

    assert_eq!(ids(&page), vec![6, 5, 4, 3, 2, 1]);
}

#[tokio::test]
async fn free_sort_returns_only_zero_market_price() {
    let handler = ListCoursesHandler::new(catalog());

    let page = handler
        .handle(ListCoursesQuery::default().sorted_by("free"))
        .await
        .unwrap();

    assert_eq!(ids(&page), vec![6, 3]);
    assert!(page.items.iter().all(|c| c.market_price == 0));
}

#[tokio::test]
async fn filters_combine_with_association() {
    let handler = ListCoursesHandler::new(catalog());
    let filter = CourseFilter {
        model: Some(CourseModel::Live),
        ..CourseFilter::default().with_category(id(100)).published_only()
    };

    let page = handler
        .handle(ListCoursesQuery::new(filter).sorted_by("popular"))
        .await
        .unwrap();

    assert_eq!(ids(&page), vec![4, 2]);
}

#[tokio::test]
async fn pages_walk_the_listing() {
    let handler = ListCoursesHandler::new(catalog());

    let first = handler
        .handle(ListCoursesQuery::default().paginated(1, 4))
        .await
        .unwrap();
    let second = handler
        .handle(ListCoursesQuery::default().paginated(2, 4))
        .await
        .unwrap();

    assert_eq!(ids(&first), vec![6, 5, 4, 3]);
    assert!(first.has_more);
    assert_eq!(ids(&second), vec![2, 1]);
    assert!(!second.has_more);
    assert_eq!(second.total, 6);
}

#[tokio::test]
async fn stats_for_unknown_course_fail() {
    let handler = GetCourseStatsHandler::new(catalog());

    let err = handler.handle(id(99)).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::CourseNotFound);
}

#[tokio::test]
async fn stats_for_bare_course_are_zero() {
    let handler = GetCourseStatsHandler::new(catalog());

    let stats = handler.handle(id(1)).await.unwrap();

    assert_eq!(stats.lesson_count, 0);
    assert_eq!(stats.review_count, 0);
    assert_eq!(stats.average_rating, None);
}
