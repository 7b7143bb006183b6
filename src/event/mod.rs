// Event-driven notification fan-out
//
// Every successful publish, clear or sweep emits a room event; transports
// subscribe per room and turn events into client notifications.

// Public API - what other modules can use
pub use bus::EventBus;
pub use events::RoomEvent;
pub use handler::{NoOpRoomEventHandler, RoomEventError, RoomEventHandler};
pub use room_subscription::{RoomSubscription, SubscriptionRegistry};

// Internal modules
mod bus;
mod events;
mod handler;
mod room_subscription;
