//! Domain events and the envelope they travel in over the event bus.
//!
//! Like toggles are the only events today; the listener routes on
//! `event_type` and reads the entity id from `aggregate_id`.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

use super::Timestamp;

/// Identification and routing data every domain event exposes.
pub trait DomainEvent: Send + Sync {
    /// Returns the event type string (e.g., "consult.liked.v1").
    /// Used for routing handlers on the event bus.
    fn event_type(&self) -> &'static str;

    /// Returns the ID of the entity that emitted this event.
    fn aggregate_id(&self) -> String;

    /// Returns the type of entity (e.g., "Consult", "Review").
    fn aggregate_type(&self) -> &'static str;

    /// Returns when the event occurred.
    fn occurred_at(&self) -> Timestamp;

    /// Returns the unique ID for this event instance.
    fn event_id(&self) -> EventId;
}

/// Extension trait that provides `to_envelope()` for serializable domain events.
pub trait SerializableDomainEvent: DomainEvent + Serialize {
    /// Converts this domain event into an `EventEnvelope` for transport.
    fn to_envelope(&self) -> Result<EventEnvelope, serde_json::Error> {
        EventEnvelope::from_event(self)
    }
}

impl<T: DomainEvent + Serialize> SerializableDomainEvent for T {}

/// Unique identifier for events (used for deduplication).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Creates a new random EventId using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport envelope for domain events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique ID for this event instance.
    pub event_id: EventId,

    /// Event type for routing (e.g., "review.liked.v1").
    pub event_type: String,

    /// Schema version number (extracted from event_type).
    pub schema_version: u32,

    /// ID of the entity that emitted this event.
    pub aggregate_id: String,

    /// Type of entity (e.g., "Consult", "Review").
    pub aggregate_type: String,

    /// When the event occurred.
    pub occurred_at: Timestamp,

    /// Event-specific payload as JSON.
    pub payload: JsonValue,
}

impl EventEnvelope {
    /// Creates a new EventEnvelope with required fields.
    ///
    /// The schema version is taken from the `.vN` suffix of the event type,
    /// defaulting to 1.
    pub fn new(
        event_type: impl Into<String>,
        aggregate_id: impl Into<String>,
        aggregate_type: impl Into<String>,
        payload: JsonValue,
    ) -> Self {
        let event_type = event_type.into();
        let schema_version = Self::extract_version(&event_type);

        Self {
            event_id: EventId::new(),
            event_type,
            schema_version,
            aggregate_id: aggregate_id.into(),
            aggregate_type: aggregate_type.into(),
            occurred_at: Timestamp::now(),
            payload,
        }
    }

    pub(crate) fn extract_version(event_type: &str) -> u32 {
        event_type
            .rsplit_once(".v")
            .and_then(|(_, version_str)| version_str.parse::<u32>().ok())
            .unwrap_or(1)
    }

    /// Creates an envelope from a domain event, serializing it as the payload.
    pub fn from_event<T>(event: &T) -> Result<Self, serde_json::Error>
    where
        T: DomainEvent + Serialize + ?Sized,
    {
        let event_type = event.event_type().to_string();
        let schema_version = Self::extract_version(&event_type);

        Ok(Self {
            event_id: event.event_id(),
            event_type,
            schema_version,
            aggregate_id: event.aggregate_id(),
            aggregate_type: event.aggregate_type().to_string(),
            occurred_at: event.occurred_at(),
            payload: serde_json::to_value(event)?,
        })
    }

    /// Deserialize payload to a specific event type.
    pub fn payload_as<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_id_generates_unique_values() {
        assert_ne!(EventId::new(), EventId::new());
    }

    #[test]
    fn event_id_serializes_as_plain_string() {
        let id = EventId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_str()));
    }

    #[test]
    fn event_envelope_extracts_version_from_event_type() {
        let v2 = EventEnvelope::new("consult.liked.v2", "7", "Consult", json!({}));
        assert_eq!(v2.schema_version, 2);

        let legacy = EventEnvelope::new("consult.liked", "7", "Consult", json!({}));
        assert_eq!(legacy.schema_version, 1);
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Sample {
        event_id: EventId,
        target_id: i64,
        occurred_at: Timestamp,
    }

    impl DomainEvent for Sample {
        fn event_type(&self) -> &'static str {
            "sample.liked.v3"
        }

        fn aggregate_id(&self) -> String {
            self.target_id.to_string()
        }

        fn aggregate_type(&self) -> &'static str {
            "Sample"
        }

        fn occurred_at(&self) -> Timestamp {
            self.occurred_at
        }

        fn event_id(&self) -> EventId {
            self.event_id.clone()
        }
    }

    #[test]
    fn envelope_from_event_copies_routing_fields() {
        let event = Sample {
            event_id: EventId::new(),
            target_id: 456,
            occurred_at: Timestamp::now(),
        };

        let envelope = event.to_envelope().unwrap();

        assert_eq!(envelope.event_id, event.event_id);
        assert_eq!(envelope.event_type, "sample.liked.v3");
        assert_eq!(envelope.schema_version, 3);
        assert_eq!(envelope.aggregate_id, "456");
        assert_eq!(envelope.aggregate_type, "Sample");
        assert_eq!(envelope.payload["target_id"], 456);

        let restored: Sample = envelope.payload_as().unwrap();
        assert_eq!(restored.target_id, 456);
    }
}
