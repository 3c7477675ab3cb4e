//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `cache` - Counter cache and dirty set (in-memory, Redis)
//! - `events` - In-process event bus
//! - `postgres` - Counter store and catalog readers
//! - `storage` - In-memory store and readers
//! - `verification` - Verification codes and mail recording

pub mod cache;
pub mod events;
pub mod postgres;
pub mod storage;
pub mod verification;

pub use cache::{InMemoryCounterCache, InMemoryDirtySet, RedisCounterCache, RedisDirtySet};
pub use events::InMemoryEventBus;
pub use postgres::{PostgresCounterStore, PostgresCourseReader, PostgresReviewReader};
pub use storage::{InMemoryCounterStore, InMemoryCourseReader, InMemoryReviewReader};
pub use verification::{InMemoryMailSender, InMemoryVerificationCodeStore, RedisVerificationCodeStore};
