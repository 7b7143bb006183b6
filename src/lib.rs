// Library crate for the drop zone server
// This file exposes the public API for integration tests

pub mod classify;
pub mod clock;
pub mod event;
pub mod item;
pub mod network;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use classify::{detect_kind, Classification, ClassifyError, ContentClassifier, NoopClassifier};
pub use clock::{Clock, ManualClock, SystemClock};
pub use event::{EventBus, RoomEvent, RoomSubscription, SubscriptionRegistry};
pub use item::{
    models::{ItemKind, ItemModel},
    repository::{InMemoryItemRepository, ItemRepository},
    service::{DropConfig, DropService},
    types::PublishRequest,
};
pub use network::{AddressRoomResolver, ClientContext, FixedRoomResolver, RoomResolver};
pub use shared::AppError;
pub use websockets::{
    ConnectionManager, InMemoryConnectionManager, MessageType, UpdateReason, WebSocketMessage,
    WebSocketRoomSubscriber,
};
