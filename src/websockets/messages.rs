use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message types for WebSocket communication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    // Client -> Server
    Refresh,

    // Server -> Client
    ItemsUpdated,
    Error,
}

/// Why the server is asking the client to re-fetch
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateReason {
    Publish,
    Clear,
    Expiry,
    /// Fallback nudge on the periodic timer; covers missed notifications
    Periodic,
    /// Client asked via a REFRESH message
    Requested,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
    pub client_id: Option<String>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub payload: serde_json::Value,
    pub meta: Option<WebSocketMessageMeta>,
}

/// Server-to-Client message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsUpdatedPayload {
    pub room_id: String,
    pub reason: UpdateReason,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
                client_id: None,
            }),
        }
    }

    /// Create an ITEMS_UPDATED message telling clients to re-fetch the room
    pub fn items_updated(room_id: &str, reason: UpdateReason) -> Self {
        let payload = ItemsUpdatedPayload {
            room_id: room_id.to_string(),
            reason,
        };
        Self::new(
            MessageType::ItemsUpdated,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create an ERROR message
    pub fn error(message: String) -> Self {
        let payload = ErrorPayload { message };
        Self::new(MessageType::Error, serde_json::to_value(payload).unwrap())
    }

    /// JSON encoding for the wire. Messages are built from plain values, so
    /// serialization cannot fail.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}
