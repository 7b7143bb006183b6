use axum::{
    extract::{Query, State, WebSocketUpgrade},
    response::Response,
};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use super::socket::Connection;
use crate::network::types::ClientContext;
use crate::shared::AppState;

#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// Stable per-session client identity; generated server-side when absent
    pub client_id: Option<String>,
}

/// WebSocket upgrade handler
///
/// GET /ws?client_id=...
/// Resolves the caller's room, registers the connection for room fan-out and
/// runs it until disconnect.
pub async fn websocket_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    client: ClientContext,
    Query(params): Query<WsParams>,
) -> Response {
    let room_id = state.room_resolver.resolve(&client).await;
    let client_id = params
        .client_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    info!(client_id = %client_id, room_id = %room_id, "WebSocket connecting");

    ws.on_upgrade(move |socket| async move {
        // One fan-out task per room, started by the first member
        state.subscriptions.ensure_room(&room_id).await;

        let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel();
        state
            .connection_manager
            .add_connection(client_id.clone(), room_id.clone(), outbound_sender)
            .await;

        let connection = Connection::new(
            client_id.clone(),
            room_id.clone(),
            Box::new(socket),
            outbound_receiver,
            state.refresh_interval,
        );

        if let Err(e) = connection.run().await {
            warn!(
                client_id = %client_id,
                room_id = %room_id,
                error = ?e,
                "WebSocket connection ended with error"
            );
        }

        state.connection_manager.remove_connection(&client_id).await;
        info!(client_id = %client_id, room_id = %room_id, "WebSocket disconnected");
    })
}
