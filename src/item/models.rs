use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// What a shared item is: plain text, a link, an uploaded file, or a code
/// snippet. The tag round-trips as SCREAMING_SNAKE_CASE on every wire and
/// storage surface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    Text,
    Link,
    File,
    Code,
}

/// File details, present iff kind = FILE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMeta {
    pub file_name: String,
    /// Human readable size, e.g. "312 KB"
    pub file_size: String,
    pub mime_type: String,
}

/// A single shared item with a bounded lifetime.
///
/// Items are immutable after creation. Expiry is logical: an item is gone the
/// instant `now >= expires_at`, whether or not storage has caught up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemModel {
    pub id: String, // UUID v4 as string
    pub kind: ItemKind,
    /// Raw text, or base64 payload for FILE items
    pub content: String,
    pub file_meta: Option<FileMeta>,
    /// Optional enrichment from the classifier, set at most once at creation
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub room_id: String,
}

impl ItemModel {
    /// Creates a new item expiring `ttl_minutes` after `now`
    pub fn new(
        room_id: String,
        kind: ItemKind,
        content: String,
        file_meta: Option<FileMeta>,
        summary: Option<String>,
        now: DateTime<Utc>,
        ttl_minutes: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            content,
            file_meta,
            summary,
            created_at: now,
            expires_at: now + Duration::minutes(ttl_minutes),
            room_id,
        }
    }

    /// An item is expired at exactly `expires_at`, not one instant later
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Formats a byte count the way the item card shows it, e.g. "312 KB"
pub fn format_human_size(bytes: usize) -> String {
    let mib = bytes as f64 / (1024.0 * 1024.0);
    if mib < 1.0 {
        format!("{} KB", (bytes as f64 / 1024.0).round() as u64)
    } else {
        format!("{:.1} MB", mib)
    }
}
