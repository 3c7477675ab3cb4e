//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Reads go through query handlers; counter writes flow through the
//! listener into the cache and are reconciled by the syncer.

pub mod handlers;

pub use handlers::{
    // Catalog
    CourseStats, GetCourseStatsHandler, ListCoursesHandler, ListCoursesQuery,
    // Counters
    CounterListener, CounterSyncer, CounterSyncerConfig, FlushReport, MaxIdCache,
    // Reviews and mail
    ReviewValidator, VerifyMailer, VerifyMailerConfig,
};
