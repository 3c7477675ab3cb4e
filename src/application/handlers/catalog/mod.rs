//! Catalog query handlers.

mod course_stats;
mod list_courses;

pub use course_stats::{CourseStats, GetCourseStatsHandler};
pub use list_courses::{ListCoursesHandler, ListCoursesQuery};
