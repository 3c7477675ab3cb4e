//! Like/unlike domain events that drive the counter listener.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainEvent, EventId, Timestamp, UserId};

use super::{CounterError, CounterKey, EntityKind};

/// Direction of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeAction {
    Like,
    Unlike,
}

impl LikeAction {
    /// Signed delta this action applies to `like_count`.
    pub fn delta(&self) -> i64 {
        match self {
            LikeAction::Like => 1,
            LikeAction::Unlike => -1,
        }
    }
}

/// Every (kind, action) pair that carries a like counter, with its event type.
pub const LIKE_EVENT_TYPES: [(EntityKind, LikeAction, &str); 6] = [
    (EntityKind::Consult, LikeAction::Like, "consult.liked.v1"),
    (EntityKind::Consult, LikeAction::Unlike, "consult.unliked.v1"),
    (EntityKind::Review, LikeAction::Like, "review.liked.v1"),
    (EntityKind::Review, LikeAction::Unlike, "review.unliked.v1"),
    (EntityKind::Chapter, LikeAction::Like, "chapter.liked.v1"),
    (EntityKind::Chapter, LikeAction::Unlike, "chapter.unliked.v1"),
];

/// Returns the event type for a like toggle, if that kind supports likes.
pub fn like_event_type(kind: EntityKind, action: LikeAction) -> Option<&'static str> {
    LIKE_EVENT_TYPES
        .iter()
        .find(|(k, a, _)| *k == kind && *a == action)
        .map(|(_, _, event_type)| *event_type)
}

/// Resolves an event type string back to its (kind, action) pair.
pub fn parse_like_event_type(event_type: &str) -> Option<(EntityKind, LikeAction)> {
    LIKE_EVENT_TYPES
        .iter()
        .find(|(_, _, t)| *t == event_type)
        .map(|(k, a, _)| (*k, *a))
}

/// A user liked or unliked a consult, review or chapter.
///
/// Only constructible for kinds listed in [`LIKE_EVENT_TYPES`], so every
/// instance has a routable event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LikeToggledPayload")]
pub struct LikeToggled {
    pub event_id: EventId,
    pub target: CounterKey,
    pub user_id: UserId,
    pub action: LikeAction,
    pub occurred_at: Timestamp,
    #[serde(skip)]
    event_type: &'static str,
}

#[derive(Deserialize)]
struct LikeToggledPayload {
    event_id: EventId,
    target: CounterKey,
    user_id: UserId,
    action: LikeAction,
    occurred_at: Timestamp,
}

impl TryFrom<LikeToggledPayload> for LikeToggled {
    type Error = CounterError;

    fn try_from(raw: LikeToggledPayload) -> Result<Self, Self::Error> {
        let event_type = like_event_type(raw.target.kind, raw.action).ok_or_else(|| {
            CounterError::InvalidEvent(format!("{} has no like counter", raw.target.kind))
        })?;
        Ok(Self {
            event_id: raw.event_id,
            target: raw.target,
            user_id: raw.user_id,
            action: raw.action,
            occurred_at: raw.occurred_at,
            event_type,
        })
    }
}

impl LikeToggled {
    /// Returns `None` when the target's kind carries no like counter.
    pub fn new(target: CounterKey, user_id: UserId, action: LikeAction) -> Option<Self> {
        let event_type = like_event_type(target.kind, action)?;
        Some(Self {
            event_id: EventId::new(),
            target,
            user_id,
            action,
            occurred_at: Timestamp::now(),
            event_type,
        })
    }
}

impl DomainEvent for LikeToggled {
    fn event_type(&self) -> &'static str {
        self.event_type
    }

    fn aggregate_id(&self) -> String {
        self.target.id.to_string()
    }

    fn aggregate_type(&self) -> &'static str {
        match self.target.kind {
            EntityKind::Course => "Course",
            EntityKind::Chapter => "Chapter",
            EntityKind::Consult => "Consult",
            EntityKind::Review => "Review",
        }
    }

    fn occurred_at(&self) -> Timestamp {
        self.occurred_at
    }

    fn event_id(&self) -> EventId {
        self.event_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{EntityId, SerializableDomainEvent};

    fn consult(id: i64) -> CounterKey {
        CounterKey::consult(EntityId::new(id).unwrap())
    }

    #[test]
    fn like_event_types_resolve_both_ways() {
        for (kind, action, event_type) in LIKE_EVENT_TYPES {
            assert_eq!(like_event_type(kind, action), Some(event_type));
            assert_eq!(parse_like_event_type(event_type), Some((kind, action)));
        }
    }

    #[test]
    fn courses_have_no_like_events() {
        assert_eq!(like_event_type(EntityKind::Course, LikeAction::Like), None);
        assert_eq!(parse_like_event_type("course.liked.v1"), None);
    }

    #[test]
    fn like_toggled_envelope_carries_target() {
        let event =
            LikeToggled::new(consult(42), UserId::new(7).unwrap(), LikeAction::Unlike).unwrap();
        let envelope = event.to_envelope().unwrap();

        assert_eq!(envelope.event_type, "consult.unliked.v1");
        assert_eq!(envelope.aggregate_id, "42");
        assert_eq!(envelope.aggregate_type, "Consult");

        let restored: LikeToggled = envelope.payload_as().unwrap();
        assert_eq!(restored, event);
    }

    #[test]
    fn course_targets_cannot_be_liked() {
        let course = CounterKey::course(EntityId::new(1).unwrap());

        for action in [LikeAction::Like, LikeAction::Unlike] {
            assert!(LikeToggled::new(course, UserId::new(7).unwrap(), action).is_none());
        }
    }

    #[test]
    fn course_payload_is_rejected_on_decode() {
        let event =
            LikeToggled::new(consult(3), UserId::new(7).unwrap(), LikeAction::Like).unwrap();
        let mut payload = serde_json::to_value(&event).unwrap();
        payload["target"]["kind"] = serde_json::json!("course");

        assert!(serde_json::from_value::<LikeToggled>(payload).is_err());
    }

    #[test]
    fn action_deltas_are_signed() {
        assert_eq!(LikeAction::Like.delta(), 1);
        assert_eq!(LikeAction::Unlike.delta(), -1);
    }
}
