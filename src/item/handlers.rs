use axum::{extract::State, Json};
use tracing::{info, instrument};

use super::types::{ClearResponse, ItemResponse, PublishRequest};
use crate::network::types::ClientContext;
use crate::shared::{AppError, AppState};

/// HTTP handler for publishing an item to the caller's room
///
/// POST /items
/// Returns the created item
#[instrument(name = "publish_item", skip(state, client, request))]
pub async fn publish_item(
    State(state): State<AppState>,
    client: ClientContext,
    Json(request): Json<PublishRequest>,
) -> Result<Json<ItemResponse>, AppError> {
    let room_id = state.room_resolver.resolve(&client).await;

    let service = state.drop_service();
    let item = service.publish(&room_id, request).await?;

    info!(item_id = %item.id, room_id = %room_id, "Item published via HTTP");

    Ok(Json(item))
}

/// HTTP handler for listing the caller's room
///
/// GET /items
/// Returns the room's non-expired items, newest first
#[instrument(name = "list_items", skip(state, client))]
pub async fn list_items(
    State(state): State<AppState>,
    client: ClientContext,
) -> Result<Json<Vec<ItemResponse>>, AppError> {
    let room_id = state.room_resolver.resolve(&client).await;

    let service = state.drop_service();
    let items = service.list(&room_id).await?;

    Ok(Json(items))
}

/// HTTP handler for clearing the caller's room
///
/// DELETE /items
/// Returns how many items were removed
#[instrument(name = "clear_items", skip(state, client))]
pub async fn clear_items(
    State(state): State<AppState>,
    client: ClientContext,
) -> Result<Json<ClearResponse>, AppError> {
    let room_id = state.room_resolver.resolve(&client).await;

    let service = state.drop_service();
    let removed = service.clear(&room_id).await?;

    info!(room_id = %room_id, removed = removed, "Room cleared via HTTP");

    Ok(Json(ClearResponse { removed }))
}
