use async_trait::async_trait;
use thiserror::Error;

use super::events::RoomEvent;

/// Errors that can occur when handling room events
#[derive(Debug, Error)]
pub enum RoomEventError {
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Trait for components that react to room events
///
/// Handlers should be idempotent: delivery is at-least-once, so the same
/// event may be handled more than once.
#[async_trait]
pub trait RoomEventHandler: Send + Sync {
    async fn handle_room_event(
        &self,
        room_id: &str,
        event: RoomEvent,
    ) -> Result<(), RoomEventError>;

    /// Get a human-readable name for this handler (for logging/debugging)
    fn handler_name(&self) -> &'static str;
}

/// A no-op room event handler for tests that need a handler but don't care
/// about the behavior.
pub struct NoOpRoomEventHandler;

#[async_trait]
impl RoomEventHandler for NoOpRoomEventHandler {
    async fn handle_room_event(
        &self,
        _room_id: &str,
        _event: RoomEvent,
    ) -> Result<(), RoomEventError> {
        Ok(())
    }

    fn handler_name(&self) -> &'static str {
        "NoOpRoomEventHandler"
    }
}
