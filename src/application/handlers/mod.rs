//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod catalog;
pub mod counter;
pub mod mail;
pub mod review;

pub use catalog::{CourseStats, GetCourseStatsHandler, ListCoursesHandler, ListCoursesQuery};
pub use counter::{CounterListener, CounterSyncer, CounterSyncerConfig, FlushReport, MaxIdCache};
pub use mail::{VerifyMailer, VerifyMailerConfig};
pub use review::ReviewValidator;
