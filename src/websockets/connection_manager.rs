use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// Tracks live WebSocket connections and routes messages to whole rooms
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn add_connection(
        &self,
        client_id: String,
        room_id: String,
        sender: mpsc::UnboundedSender<String>,
    );

    async fn remove_connection(&self, client_id: &str);

    /// Best-effort fan-out to every connection in the room
    async fn send_to_room(&self, room_id: &str, message: &str);

    /// Number of live connections in the room (the "devices nearby" count)
    async fn connection_count(&self, room_id: &str) -> usize;
}

struct ConnectionEntry {
    room_id: String,
    sender: mpsc::UnboundedSender<String>,
}

pub struct InMemoryConnectionManager {
    // client_id -> connection
    connections: Arc<RwLock<HashMap<String, ConnectionEntry>>>,
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(
        &self,
        client_id: String,
        room_id: String,
        sender: mpsc::UnboundedSender<String>,
    ) {
        let mut connections = self.connections.write().await;
        connections.insert(client_id, ConnectionEntry { room_id, sender });
    }

    async fn remove_connection(&self, client_id: &str) {
        let mut connections = self.connections.write().await;
        connections.remove(client_id);
    }

    async fn send_to_room(&self, room_id: &str, message: &str) {
        let connections = self.connections.read().await;
        for entry in connections.values() {
            if entry.room_id == room_id {
                // A closed receiver just means the connection is going away
                let _ = entry.sender.send(message.to_string());
            }
        }
    }

    async fn connection_count(&self, room_id: &str) -> usize {
        let connections = self.connections.read().await;
        connections
            .values()
            .filter(|entry| entry.room_id == room_id)
            .count()
    }
}
