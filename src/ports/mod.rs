//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Counter Ports
//!
//! - `CounterCache` - Atomic per-entity counters (fast path)
//! - `DirtySet` - Keys awaiting reconciliation, with atomic claim
//! - `CounterStore` - Durable counter columns
//!
//! ## Read Ports
//!
//! - `CourseReader` - Course listings, associations and aggregate counts
//! - `ReviewReader` - Review and review-like lookups
//!
//! ## Event Ports
//!
//! - `EventPublisher` / `EventSubscriber` / `EventHandler`
//!
//! ## Verification Ports
//!
//! - `VerificationCodeStore` - One-time codes with expiry
//! - `MailSender` - Mail transport

mod counter_cache;
mod counter_store;
mod course_reader;
mod dirty_set;
mod event_publisher;
mod event_subscriber;
mod review_reader;
mod verification;

pub use counter_cache::{CounterCache, CounterSnapshot};
pub use counter_store::CounterStore;
pub use course_reader::CourseReader;
pub use dirty_set::DirtySet;
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use review_reader::ReviewReader;
pub use verification::{MailSender, OutgoingMail, VerificationCodeStore};
