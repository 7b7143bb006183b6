//! Test assertion helpers for verifying delivered notifications
#![allow(dead_code)] // Test utilities may not all be used in every test

use std::time::Duration;

use dropzone::websockets::{MessageType, UpdateReason, WebSocketMessage};
use serde_json::Value;

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct MessageAssertion<'a> {
    setup: &'a TestSetup,
    clients: Vec<&'a str>,
}

impl<'a> MessageAssertion<'a> {
    /// Create an assertion for specific clients
    pub fn for_clients(setup: &'a TestSetup, clients: Vec<&'a str>) -> Self {
        Self { setup, clients }
    }

    /// Assert every client eventually received a message of the given type;
    /// delivery runs through a background task, so this polls briefly.
    pub async fn received_message_type(self, expected_type: MessageType) -> Vec<WebSocketMessage> {
        let mut received = Vec::new();

        for client in &self.clients {
            let message = wait_for_message(self.setup, client, &expected_type).await;
            assert!(
                message.is_some(),
                "{} should have received a {:?} message",
                client,
                expected_type
            );
            received.push(message.unwrap());
        }

        received
    }

    /// Assert the clients received nothing at all
    pub async fn received_no_messages(self) {
        // Give any in-flight delivery a moment to land before checking
        tokio::time::sleep(Duration::from_millis(50)).await;

        for client in &self.clients {
            let messages = self.setup.mock_conn_manager.get_messages_for(client).await;
            assert!(
                messages.is_empty(),
                "{} should not have received messages, got: {:?}",
                client,
                messages
            );
        }
    }
}

async fn wait_for_message(
    setup: &TestSetup,
    client: &str,
    expected_type: &MessageType,
) -> Option<WebSocketMessage> {
    for _ in 0..100 {
        let messages = setup.mock_conn_manager.get_messages_for(client).await;
        for raw in &messages {
            let message: WebSocketMessage =
                serde_json::from_str(raw).expect("delivered message should be valid JSON");
            if message.message_type == *expected_type {
                return Some(message);
            }
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    None
}

/// Extracts the update reason from an ITEMS_UPDATED message
pub fn update_reason(message: &WebSocketMessage) -> UpdateReason {
    assert_eq!(message.message_type, MessageType::ItemsUpdated);
    let payload: Value = message.payload.clone();
    serde_json::from_value(payload["reason"].clone()).expect("payload should carry a reason")
}
