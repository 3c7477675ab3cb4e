//! In-memory storage adapters.
//!
//! - `InMemoryCounterStore` - Durable counter columns, with a write-failure switch
//! - `InMemoryCourseReader` - Course listings, associations and aggregates
//! - `InMemoryReviewReader` - Review and review-like lookups

mod in_memory_catalog;
mod in_memory_counter_store;

pub use in_memory_catalog::{InMemoryCourseReader, InMemoryReviewReader};
pub use in_memory_counter_store::InMemoryCounterStore;
