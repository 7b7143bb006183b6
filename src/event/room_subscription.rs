use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{bus::EventBus, handler::RoomEventHandler};

/// Routes one room's events to a handler from a background task
pub struct RoomSubscription {
    room_id: String,
    handler: Arc<dyn RoomEventHandler>,
    event_bus: EventBus,
}

impl RoomSubscription {
    pub fn new(room_id: String, handler: Arc<dyn RoomEventHandler>, event_bus: EventBus) -> Self {
        Self {
            room_id,
            handler,
            event_bus,
        }
    }

    /// Start the subscription - spawns a background task that listens to room
    /// events and routes them to the handler
    pub async fn start(self) -> JoinHandle<()> {
        let room_id = self.room_id.clone();
        let handler_name = self.handler.handler_name();

        info!(
            room_id = %room_id,
            handler = handler_name,
            "Starting room subscription"
        );

        let mut receiver = self.event_bus.subscribe_to_room(&room_id).await;

        tokio::spawn(async move {
            while let Ok(event) = receiver.recv().await {
                if let Err(e) = self.handler.handle_room_event(&room_id, event).await {
                    warn!(
                        room_id = %room_id,
                        handler = handler_name,
                        error = %e,
                        "Room event handler failed"
                    );
                }
            }

            warn!(
                room_id = %room_id,
                handler = handler_name,
                "Room subscription ended - no more events"
            );
        })
    }
}

/// Lazily starts one [`RoomSubscription`] per room.
///
/// WebSocket connections call [`ensure_room`](Self::ensure_room) on join; the
/// first caller for a room spawns the fan-out task, later callers find it
/// already running. One subscription per room keeps fan-out single-writer:
/// the handler broadcasts to every connection in the room, so a subscription
/// per connection would duplicate notifications.
pub struct SubscriptionRegistry {
    event_bus: EventBus,
    handler: Arc<dyn RoomEventHandler>,
    active: RwLock<HashMap<String, JoinHandle<()>>>,
}

impl SubscriptionRegistry {
    pub fn new(event_bus: EventBus, handler: Arc<dyn RoomEventHandler>) -> Self {
        Self {
            event_bus,
            handler,
            active: RwLock::new(HashMap::new()),
        }
    }

    pub async fn ensure_room(&self, room_id: &str) {
        {
            let active = self.active.read().await;
            if active.contains_key(room_id) {
                return;
            }
        }

        let mut active = self.active.write().await;
        if active.contains_key(room_id) {
            return;
        }

        let subscription = RoomSubscription::new(
            room_id.to_string(),
            Arc::clone(&self.handler),
            self.event_bus.clone(),
        );
        let handle = subscription.start().await;
        active.insert(room_id.to_string(), handle);
    }
}
