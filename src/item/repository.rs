use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{FileMeta, ItemKind, ItemModel};
use crate::shared::AppError;

/// Trait for item store operations.
///
/// Expiry is enforced here as a read-time predicate: `list_room` takes `now`
/// and never returns an item past its `expires_at`, regardless of whether
/// storage still holds it. Callers own the clock.
#[async_trait]
pub trait ItemRepository {
    /// Appends a new item. Each insert is independent - concurrent publishes
    /// must not lose each other's writes.
    async fn insert(&self, item: &ItemModel) -> Result<(), AppError>;

    /// Returns the room's non-expired items, newest first. Items with equal
    /// `created_at` keep a stable relative order within a snapshot.
    async fn list_room(
        &self,
        room_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ItemModel>, AppError>;

    /// Removes all items for a room, leaving other rooms untouched.
    /// Returns how many were removed.
    async fn clear_room(&self, room_id: &str) -> Result<u64, AppError>;

    /// Storage hygiene: physically drops items past their expiry.
    /// Returns removed counts per room. Not required for correctness -
    /// `list_room` already hides expired items.
    async fn remove_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<HashMap<String, u64>, AppError>;
}

/// In-memory implementation of ItemRepository for development and testing
///
/// Items live in a single append-ordered collection behind a mutex; the lock
/// makes each insert an atomic append and `list_room` a consistent snapshot.
pub struct InMemoryItemRepository {
    items: Mutex<Vec<ItemModel>>,
}

impl Default for InMemoryItemRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryItemRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// Returns the number of physically stored items, expired ones included
    /// (useful for compaction checks and debugging)
    pub fn item_count(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    #[instrument(skip(self, item))]
    async fn insert(&self, item: &ItemModel) -> Result<(), AppError> {
        let mut items = self.items.lock().unwrap();
        items.push(item.clone());

        debug!(item_id = %item.id, room_id = %item.room_id, "Item stored in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_room(
        &self,
        room_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ItemModel>, AppError> {
        let mut items = self.items.lock().unwrap();

        // Opportunistic compaction: a read that observes expired items drops
        // them from storage. Correctness never depends on this happening.
        if items.iter().any(|i| i.is_expired(now)) {
            let before = items.len();
            items.retain(|i| !i.is_expired(now));
            debug!(
                compacted = before - items.len(),
                "Compacted expired items during read"
            );
        }

        let mut room_items: Vec<ItemModel> = items
            .iter()
            .filter(|i| i.room_id == room_id)
            .cloned()
            .collect();

        // Stable sort over the append-ordered collection: equal timestamps
        // keep insertion order within the snapshot
        room_items.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        debug!(room_id = %room_id, count = room_items.len(), "Items listed from memory");
        Ok(room_items)
    }

    #[instrument(skip(self))]
    async fn clear_room(&self, room_id: &str) -> Result<u64, AppError> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|i| i.room_id != room_id);
        let removed = (before - items.len()) as u64;

        debug!(room_id = %room_id, removed = removed, "Room cleared in memory");
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn remove_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<HashMap<String, u64>, AppError> {
        let mut items = self.items.lock().unwrap();
        let mut removed: HashMap<String, u64> = HashMap::new();

        items.retain(|i| {
            if i.is_expired(now) {
                *removed.entry(i.room_id.clone()).or_default() += 1;
                false
            } else {
                true
            }
        });

        debug!(rooms = removed.len(), "Expired items removed from memory");
        Ok(removed)
    }
}

/// PostgreSQL implementation of the item repository
///
/// Expected schema:
///
/// ```sql
/// CREATE TABLE shared_items (
///     id         TEXT PRIMARY KEY,
///     room_id    TEXT NOT NULL,
///     kind       TEXT NOT NULL,
///     content    TEXT NOT NULL,
///     file_name  TEXT,
///     file_size  TEXT,
///     mime_type  TEXT,
///     summary    TEXT,
///     created_at TIMESTAMPTZ NOT NULL,
///     expires_at TIMESTAMPTZ NOT NULL
/// );
/// ```
pub struct PostgresItemRepository {
    pool: PgPool,
}

impl PostgresItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Decodes one row, or None if the row is malformed. A corrupt record is
    /// skipped individually; it never aborts the rest of the listing.
    fn decode_row(row: &sqlx::postgres::PgRow) -> Option<ItemModel> {
        let id: String = match row.try_get("id") {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Skipping item row without id");
                return None;
            }
        };

        let kind_tag: String = match row.try_get("kind") {
            Ok(kind) => kind,
            Err(e) => {
                warn!(item_id = %id, error = %e, "Skipping item row without kind");
                return None;
            }
        };
        let kind = match ItemKind::from_str(&kind_tag) {
            Ok(kind) => kind,
            Err(_) => {
                warn!(item_id = %id, kind = %kind_tag, "Skipping item row with unknown kind");
                return None;
            }
        };

        let content: String = row.try_get("content").ok()?;
        let created_at: DateTime<Utc> = match row.try_get("created_at") {
            Ok(ts) => ts,
            Err(e) => {
                warn!(item_id = %id, error = %e, "Skipping item row with bad created_at");
                return None;
            }
        };
        let expires_at: DateTime<Utc> = match row.try_get("expires_at") {
            Ok(ts) => ts,
            Err(e) => {
                warn!(item_id = %id, error = %e, "Skipping item row with bad expires_at");
                return None;
            }
        };

        let file_name: Option<String> = row.try_get("file_name").ok().flatten();
        let file_size: Option<String> = row.try_get("file_size").ok().flatten();
        let mime_type: Option<String> = row.try_get("mime_type").ok().flatten();
        let file_meta = match (file_name, file_size, mime_type) {
            (Some(file_name), Some(file_size), Some(mime_type)) => Some(FileMeta {
                file_name,
                file_size,
                mime_type,
            }),
            _ => None,
        };

        Some(ItemModel {
            id,
            kind,
            content,
            file_meta,
            summary: row.try_get("summary").ok().flatten(),
            created_at,
            expires_at,
            room_id: row.try_get("room_id").ok()?,
        })
    }
}

#[async_trait]
impl ItemRepository for PostgresItemRepository {
    #[instrument(skip(self, item))]
    async fn insert(&self, item: &ItemModel) -> Result<(), AppError> {
        debug!(item_id = %item.id, room_id = %item.room_id, "Storing item in database");

        let (file_name, file_size, mime_type) = match &item.file_meta {
            Some(meta) => (
                Some(meta.file_name.as_str()),
                Some(meta.file_size.as_str()),
                Some(meta.mime_type.as_str()),
            ),
            None => (None, None, None),
        };

        sqlx::query(
            "INSERT INTO shared_items (id, room_id, kind, content, file_name, file_size, mime_type, summary, created_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(&item.id)
        .bind(&item.room_id)
        .bind(item.kind.to_string())
        .bind(&item.content)
        .bind(file_name)
        .bind(file_size)
        .bind(mime_type)
        .bind(&item.summary)
        .bind(item.created_at)
        .bind(item.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to store item in database");
            AppError::Storage(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_room(
        &self,
        room_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ItemModel>, AppError> {
        let rows = sqlx::query(
            "SELECT id, room_id, kind, content, file_name, file_size, mime_type, summary, created_at, expires_at \
             FROM shared_items WHERE room_id = $1 AND expires_at > $2 \
             ORDER BY created_at DESC, id",
        )
        .bind(room_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, room_id = %room_id, "Failed to list items from database");
            AppError::Storage(e.to_string())
        })?;

        let items: Vec<ItemModel> = rows.iter().filter_map(Self::decode_row).collect();

        debug!(room_id = %room_id, count = items.len(), "Items listed from database");
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn clear_room(&self, room_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM shared_items WHERE room_id = $1")
            .bind(room_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, room_id = %room_id, "Failed to clear room in database");
                AppError::Storage(e.to_string())
            })?;

        debug!(room_id = %room_id, removed = result.rows_affected(), "Room cleared in database");
        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn remove_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<HashMap<String, u64>, AppError> {
        let rows = sqlx::query("DELETE FROM shared_items WHERE expires_at <= $1 RETURNING room_id")
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to remove expired items from database");
                AppError::Storage(e.to_string())
            })?;

        let mut removed: HashMap<String, u64> = HashMap::new();
        for row in &rows {
            if let Ok(room_id) = row.try_get::<String, _>("room_id") {
                *removed.entry(room_id).or_default() += 1;
            }
        }

        debug!(rooms = removed.len(), "Expired items removed from database");
        Ok(removed)
    }
}
