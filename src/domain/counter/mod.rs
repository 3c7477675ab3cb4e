//! Counter domain - cached per-entity counters and their like events.

mod errors;
mod events;
mod field;
mod policy;

pub use errors::CounterError;
pub use events::{
    like_event_type, parse_like_event_type, LikeAction, LikeToggled, LIKE_EVENT_TYPES,
};
pub use field::{CounterField, CounterKey, EntityKind};
pub use policy::ClampPolicy;
