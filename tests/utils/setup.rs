//! Builder-based setup for end-to-end drop zone scenarios
#![allow(dead_code)] // Test utilities may not all be used in every test

use std::sync::Arc;
use tokio::task::JoinHandle;

use dropzone::{
    item::types::{ItemResponse, PublishRequest},
    ContentClassifier, DropConfig, DropService, EventBus, InMemoryItemRepository, ManualClock,
    NoopClassifier, RoomSubscription, WebSocketRoomSubscriber,
};

use super::mocks::MockConnectionManager;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub event_bus: EventBus,
    pub repository: Arc<InMemoryItemRepository>,
    pub clock: Arc<ManualClock>,
    pub service: Arc<DropService>,
    pub mock_conn_manager: Arc<MockConnectionManager>,
    pub _subscription_handles: Vec<JoinHandle<()>>,
}

impl TestSetup {
    pub async fn publish_text(&self, room_id: &str, content: &str) -> ItemResponse {
        self.service
            .publish(room_id, PublishRequest::text(content))
            .await
            .expect("publish should succeed")
    }

    pub async fn list(&self, room_id: &str) -> Vec<ItemResponse> {
        self.service
            .list(room_id)
            .await
            .expect("list should succeed")
    }

    pub async fn clear(&self, room_id: &str) -> u64 {
        self.service
            .clear(room_id)
            .await
            .expect("clear should succeed")
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.clock.advance(chrono::Duration::minutes(minutes));
    }

    pub fn advance_seconds(&self, seconds: i64) {
        self.clock.advance(chrono::Duration::seconds(seconds));
    }
}

pub struct TestSetupBuilder {
    rooms: Vec<String>,
    clients: Vec<(String, String)>, // (client_id, room_id)
    classifier: Arc<dyn ContentClassifier>,
    config: DropConfig,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            rooms: vec!["room-test".to_string()],
            clients: vec![],
            classifier: Arc::new(NoopClassifier),
            config: DropConfig::default(),
        }
    }

    pub fn with_rooms(mut self, rooms: Vec<&str>) -> Self {
        self.rooms = rooms.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_client(mut self, client_id: &str, room_id: &str) -> Self {
        self.clients
            .push((client_id.to_string(), room_id.to_string()));
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ContentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_config(mut self, config: DropConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn build(self) -> TestSetup {
        let event_bus = EventBus::new();
        let repository = Arc::new(InMemoryItemRepository::new());
        let clock = Arc::new(ManualClock::from_system());
        let mock_conn_manager = Arc::new(MockConnectionManager::new());

        let service = Arc::new(DropService::new(
            repository.clone(),
            self.classifier,
            event_bus.clone(),
            clock.clone(),
            self.config,
        ));

        // Connect scripted clients
        for (client_id, room_id) in &self.clients {
            mock_conn_manager.add_client(client_id, room_id).await;
        }

        // One fan-out subscription per room, like the ws handler starts
        let mut subscription_handles = Vec::new();
        for room_id in &self.rooms {
            let subscriber = WebSocketRoomSubscriber::new(mock_conn_manager.clone());
            let subscription = RoomSubscription::new(
                room_id.clone(),
                Arc::new(subscriber),
                event_bus.clone(),
            );
            subscription_handles.push(subscription.start().await);
        }

        TestSetup {
            event_bus,
            repository,
            clock,
            service,
            mock_conn_manager,
            _subscription_handles: subscription_handles,
        }
    }
}

impl Default for TestSetupBuilder {
    fn default() -> Self {
        Self::new()
    }
}
