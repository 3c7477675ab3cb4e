//! Catalog domain - courses, chapters and listing query composition.

mod chapter;
mod course;
mod query;

pub use chapter::{Chapter, FileStatus, LessonAttrs, NewChapter};
pub use course::{Course, CourseLevel, CourseModel};
pub use query::{
    compose, ComposedQuery, CourseAssociation, CourseFilter, CourseOrder, CoursePredicate,
    CourseQueryPlan, CourseSort, Page, PageRequest, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
