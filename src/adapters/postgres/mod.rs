//! PostgreSQL adapters - Database implementations for store and reader ports.
//!
//! - `PostgresCounterStore` - Overwrites durable counter columns
//! - `PostgresCourseReader` - Course listings, chapters and aggregate counts
//! - `PostgresReviewReader` - Review and review-like lookups
//!
//! The schema these adapters expect is in `migrations/`.

mod counter_store;
mod course_reader;
mod review_reader;

pub use counter_store::PostgresCounterStore;
pub use course_reader::PostgresCourseReader;
pub use review_reader::PostgresReviewReader;
