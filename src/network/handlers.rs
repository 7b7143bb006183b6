use axum::{extract::State, Json};
use tracing::{debug, instrument};

use super::types::{ClientContext, NetworkStatusResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler for the caller's network status
///
/// GET /network
/// Returns the resolved room, a display label for the network, and the
/// number of devices currently connected to the room.
#[instrument(name = "network_status", skip(state, client))]
pub async fn network_status(
    State(state): State<AppState>,
    client: ClientContext,
) -> Result<Json<NetworkStatusResponse>, AppError> {
    let room_id = state.room_resolver.resolve(&client).await;
    let network_label = state.room_resolver.network_label(&client).await;
    let device_count = state.connection_manager.connection_count(&room_id).await;

    debug!(
        room_id = %room_id,
        device_count = device_count,
        "Resolved network status"
    );

    Ok(Json(NetworkStatusResponse {
        room_id,
        network_label,
        device_count,
    }))
}
