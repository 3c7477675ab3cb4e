//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, events, errors, timestamps)
//! - `counter` - Cached per-entity counters, clamp policy, like events
//! - `catalog` - Courses, chapters and listing query composition
//! - `review` - Course reviews and star ratings

pub mod catalog;
pub mod counter;
pub mod foundation;
pub mod review;
