//! Mock infrastructure shared by the workflow tests
#![allow(dead_code)] // Test utilities may not all be used in every test

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use dropzone::{Classification, ClassifyError, ConnectionManager, ContentClassifier};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Connection manager that records every message per client instead of
/// pushing it down a real socket
#[derive(Clone)]
pub struct MockConnectionManager {
    // client_id -> room_id
    clients: Arc<RwLock<HashMap<String, String>>>,
    // client_id -> messages received
    sent_messages: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl MockConnectionManager {
    pub fn new() -> Self {
        Self {
            clients: Arc::new(RwLock::new(HashMap::new())),
            sent_messages: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn add_client(&self, client_id: &str, room_id: &str) {
        self.clients
            .write()
            .await
            .insert(client_id.to_string(), room_id.to_string());
    }

    pub async fn get_messages_for(&self, client_id: &str) -> Vec<String> {
        self.sent_messages
            .read()
            .await
            .get(client_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn clear_messages(&self) {
        self.sent_messages.write().await.clear();
    }
}

#[async_trait]
impl ConnectionManager for MockConnectionManager {
    async fn add_connection(
        &self,
        client_id: String,
        room_id: String,
        _sender: mpsc::UnboundedSender<String>,
    ) {
        self.add_client(&client_id, &room_id).await;
    }

    async fn remove_connection(&self, client_id: &str) {
        self.clients.write().await.remove(client_id);
    }

    async fn send_to_room(&self, room_id: &str, message: &str) {
        let clients = self.clients.read().await;
        let mut sent = self.sent_messages.write().await;
        for (client_id, client_room) in clients.iter() {
            if client_room == room_id {
                sent.entry(client_id.clone())
                    .or_default()
                    .push(message.to_string());
            }
        }
    }

    async fn connection_count(&self, room_id: &str) -> usize {
        self.clients
            .read()
            .await
            .values()
            .filter(|room| room.as_str() == room_id)
            .count()
    }
}

/// Classifier with a scripted outcome: a fixed classification, or failure
pub struct ScriptedClassifier {
    result: Option<Classification>,
}

impl ScriptedClassifier {
    pub fn succeeding(classification: Classification) -> Self {
        Self {
            result: Some(classification),
        }
    }

    pub fn failing() -> Self {
        Self { result: None }
    }
}

#[async_trait]
impl ContentClassifier for ScriptedClassifier {
    async fn analyze(&self, _text: &str) -> Result<Classification, ClassifyError> {
        match &self.result {
            Some(classification) => Ok(classification.clone()),
            None => Err(ClassifyError::Request("scripted failure".to_string())),
        }
    }
}
