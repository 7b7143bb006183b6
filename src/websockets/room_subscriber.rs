use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::connection_manager::ConnectionManager;
use super::messages::{UpdateReason, WebSocketMessage};
use crate::event::{RoomEvent, RoomEventError, RoomEventHandler};

/// WebSocket-specific room event handler
///
/// Every room event becomes the same client instruction: re-fetch the item
/// list. Only the reason differs, so clients can tell a publish from an
/// expiry when updating their UI.
pub struct WebSocketRoomSubscriber {
    connection_manager: Arc<dyn ConnectionManager>,
}

impl WebSocketRoomSubscriber {
    pub fn new(connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self { connection_manager }
    }
}

#[async_trait]
impl RoomEventHandler for WebSocketRoomSubscriber {
    async fn handle_room_event(
        &self,
        room_id: &str,
        event: RoomEvent,
    ) -> Result<(), RoomEventError> {
        let reason = match &event {
            RoomEvent::ItemPublished { .. } => UpdateReason::Publish,
            RoomEvent::RoomCleared { .. } => UpdateReason::Clear,
            RoomEvent::ItemsExpired { .. } => UpdateReason::Expiry,
        };

        debug!(
            room_id = %room_id,
            event = event.event_type(),
            "Notifying room connections"
        );

        let message = WebSocketMessage::items_updated(room_id, reason);
        self.connection_manager
            .send_to_room(room_id, &message.to_json())
            .await;

        Ok(())
    }

    fn handler_name(&self) -> &'static str {
        "WebSocketRoomSubscriber"
    }
}
