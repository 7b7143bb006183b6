use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::events::RoomEvent;

/// Buffered events per room channel before slow subscribers start lagging.
/// A lagged subscriber only misses nudges, never state; the next re-fetch
/// converges.
const ROOM_CHANNEL_CAPACITY: usize = 64;

/// Event bus distributing room events to all subscribers of a room
#[derive(Debug, Clone)]
pub struct EventBus {
    /// Room-specific event channels: room_id -> sender
    room_channels: Arc<RwLock<HashMap<String, broadcast::Sender<RoomEvent>>>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            room_channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the sender for a room, creating the channel lazily.
    async fn sender_for_room(&self, room_id: &str) -> broadcast::Sender<RoomEvent> {
        {
            let room_channels = self.room_channels.read().await;
            if let Some(sender) = room_channels.get(room_id) {
                return sender.clone();
            }
        }

        let mut room_channels = self.room_channels.write().await;
        room_channels
            .entry(room_id.to_string())
            .or_insert_with(|| {
                debug!(room_id = %room_id, "Creating room event channel");
                broadcast::channel(ROOM_CHANNEL_CAPACITY).0
            })
            .clone()
    }

    /// Emits an event to all subscribers of a specific room
    pub async fn emit_to_room(&self, room_id: &str, event: RoomEvent) {
        let sender = self.sender_for_room(room_id).await;

        match sender.send(event) {
            Ok(receiver_count) => {
                debug!(
                    room_id = %room_id,
                    receivers = receiver_count,
                    "Room event emitted"
                );
            }
            Err(_) => {
                debug!(room_id = %room_id, "Room event emitted with no receivers");
            }
        }
    }

    /// Subscribe to events for a specific room
    pub async fn subscribe_to_room(&self, room_id: &str) -> broadcast::Receiver<RoomEvent> {
        self.sender_for_room(room_id).await.subscribe()
    }
}
