//! Event bus adapters.
//!
//! - `InMemoryEventBus` - In-process bus; like/unlike events reach the
//!   counter listener through it

mod in_memory;

pub use in_memory::InMemoryEventBus;
