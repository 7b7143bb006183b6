use serde::{Deserialize, Serialize};

use crate::item::models::ItemKind;

/// Events about changes to a room's item set.
///
/// Events are facts about things that have already happened; the bus routes
/// them by room, so they do not carry the room id themselves. Delivery is
/// at-least-once and best-effort: subscribers converge by re-fetching the
/// item list, not by replaying events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RoomEvent {
    /// A new item was published to the room
    ItemPublished { item_id: String, kind: ItemKind },

    /// All of the room's items were removed at a client's request
    RoomCleared { removed: u64 },

    /// The background sweep removed expired items from the room
    ItemsExpired { removed: u64 },
}

impl RoomEvent {
    /// Get a human-readable description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            RoomEvent::ItemPublished { .. } => "item_published",
            RoomEvent::RoomCleared { .. } => "room_cleared",
            RoomEvent::ItemsExpired { .. } => "items_expired",
        }
    }
}
