use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::messages::{MessageType, UpdateReason, WebSocketMessage};

/// Simple WebSocket abstraction - all we care about is send/receive
#[async_trait]
pub trait SocketWrapper: Send {
    /// Send a text message to the client
    async fn send_message(&mut self, message: String) -> Result<(), SocketError>;

    /// Receive the next message from the client (None if connection closed)
    async fn receive_message(&mut self) -> Result<Option<String>, SocketError>;

    /// Close the connection
    async fn close(&mut self) -> Result<(), SocketError>;
}

#[derive(Debug)]
pub enum SocketError {
    SendFailed(String),
    ReceiveFailed(String),
}

/// Direct implementation on axum's WebSocket
#[async_trait]
impl SocketWrapper for WebSocket {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.send(Message::Text(message))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
        loop {
            match self.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Close(_))) => return Ok(None),
                Some(Ok(_)) => continue, // Ignore binary/ping/pong
                Some(Err(e)) => return Err(SocketError::ReceiveFailed(e.to_string())),
                None => return Ok(None), // Connection closed
            }
        }
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        self.send(Message::Close(None))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

/// A managed WebSocket connection for one client in one room.
///
/// Runs three concerns in a single select loop: outbound notifications from
/// the room subscriber, inbound client messages, and the periodic refresh
/// nudge that makes delivery converge even when a notification is missed.
pub struct Connection {
    pub client_id: String,
    pub room_id: String,
    socket: Box<dyn SocketWrapper>,
    outbound_receiver: mpsc::UnboundedReceiver<String>,
    refresh_interval: Duration,
}

impl Connection {
    pub fn new(
        client_id: String,
        room_id: String,
        socket: Box<dyn SocketWrapper>,
        outbound_receiver: mpsc::UnboundedReceiver<String>,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            client_id,
            room_id,
            socket,
            outbound_receiver,
            refresh_interval,
        }
    }

    /// Run the connection - handles both directions until disconnect
    pub async fn run(mut self) -> Result<(), SocketError> {
        // The first tick fires immediately, so a fresh client gets an initial
        // nudge and fetches the current snapshot without waiting
        let mut refresh = tokio::time::interval(self.refresh_interval);
        refresh.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                // Outbound notifications (room subscriber -> client)
                msg = self.outbound_receiver.recv() => {
                    match msg {
                        Some(message) => self.socket.send_message(message).await?,
                        None => break, // Channel closed, disconnect
                    }
                }

                // Inbound messages (client -> server)
                msg = self.socket.receive_message() => {
                    match msg {
                        Ok(Some(message)) => self.handle_inbound(message).await?,
                        Ok(None) => break, // Client disconnected
                        Err(e) => return Err(e),
                    }
                }

                // Fallback re-fetch nudge
                _ = refresh.tick() => {
                    let nudge = WebSocketMessage::items_updated(&self.room_id, UpdateReason::Periodic);
                    self.socket.send_message(nudge.to_json()).await?;
                }
            }
        }

        // Clean disconnect
        let _ = self.socket.close().await;
        Ok(())
    }

    async fn handle_inbound(&mut self, raw: String) -> Result<(), SocketError> {
        match serde_json::from_str::<WebSocketMessage>(&raw) {
            Ok(message) => match message.message_type {
                MessageType::Refresh => {
                    let reply =
                        WebSocketMessage::items_updated(&self.room_id, UpdateReason::Requested);
                    self.socket.send_message(reply.to_json()).await
                }
                other => {
                    debug!(
                        client_id = %self.client_id,
                        message_type = ?other,
                        "Ignoring unexpected client message type"
                    );
                    Ok(())
                }
            },
            Err(e) => {
                warn!(
                    client_id = %self.client_id,
                    room_id = %self.room_id,
                    error = %e,
                    "Failed to parse WebSocket message"
                );
                let reply = WebSocketMessage::error("Unrecognized message".to_string());
                self.socket.send_message(reply.to_json()).await
            }
        }
    }
}
