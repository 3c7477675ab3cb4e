//! EventPublisher port - Interface for publishing domain events.
//!
//! Request handlers publish like/unlike events here without knowing whether
//! delivery is synchronous (in-process bus) or queued.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Implementations must ensure:
/// - Events are delivered at-least-once (handlers may receive duplicates)
/// - Handler errors are propagated to the caller when delivery is synchronous
///
/// # Example
///
/// ```ignore
/// if let Some(event) = LikeToggled::new(CounterKey::consult(id), user_id, LikeAction::Like) {
///     publisher.publish(event.to_envelope()?).await?;
/// }
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish multiple events in order.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError>;
}
