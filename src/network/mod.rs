// Public API - what other modules can use
pub use handlers::network_status;
pub use resolver::{AddressRoomResolver, FixedRoomResolver, RoomResolver, DEFAULT_ROOM_ID};
pub use types::{ClientContext, NetworkStatusResponse};

// Internal modules
mod handlers;
pub mod resolver;
pub mod types;
