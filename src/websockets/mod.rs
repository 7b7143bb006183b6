// Public API
pub use connection_manager::{ConnectionManager, InMemoryConnectionManager};
pub use handler::websocket_handler;
pub use messages::{MessageType, UpdateReason, WebSocketMessage};
pub use room_subscriber::WebSocketRoomSubscriber;
pub use socket::{Connection, SocketError, SocketWrapper};

// Internal modules
mod connection_manager;
mod handler;
mod messages;
mod room_subscriber;
mod socket;
