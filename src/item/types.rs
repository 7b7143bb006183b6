use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{ItemKind, ItemModel};

/// Request payload for publishing an item
///
/// `kind` is advisory: FILE is implied by `file_name`, and TEXT posts may be
/// reclassified by the content classifier. LINK and CODE are honored as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishRequest {
    pub content: String,
    #[serde(default)]
    pub kind: Option<ItemKind>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub ttl_minutes: Option<i64>,
}

impl PublishRequest {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: None,
            file_name: None,
            file_size: None,
            mime_type: None,
            ttl_minutes: None,
        }
    }
}

/// Response for published and listed items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResponse {
    pub id: String,
    pub kind: ItemKind,
    pub content: String,
    pub file_name: Option<String>,
    pub file_size: Option<String>,
    pub mime_type: Option<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub room_id: String,
}

impl From<ItemModel> for ItemResponse {
    fn from(item: ItemModel) -> Self {
        let (file_name, file_size, mime_type) = match item.file_meta {
            Some(meta) => (Some(meta.file_name), Some(meta.file_size), Some(meta.mime_type)),
            None => (None, None, None),
        };

        Self {
            id: item.id,
            kind: item.kind,
            content: item.content,
            file_name,
            file_size,
            mime_type,
            summary: item.summary,
            created_at: item.created_at,
            expires_at: item.expires_at,
            room_id: item.room_id,
        }
    }
}

/// Response for clearing a room
#[derive(Debug, Serialize, Deserialize)]
pub struct ClearResponse {
    pub removed: u64,
}
