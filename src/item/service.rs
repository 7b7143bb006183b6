use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{format_human_size, FileMeta, ItemKind, ItemModel},
    repository::ItemRepository,
    types::{ItemResponse, PublishRequest},
};
use crate::classify::{detect_kind, ContentClassifier};
use crate::clock::Clock;
use crate::event::{EventBus, RoomEvent};
use crate::shared::AppError;

/// Tuning for the publish pipeline
#[derive(Debug, Clone)]
pub struct DropConfig {
    /// Lifetime of an item when the caller does not pick one
    pub default_ttl_minutes: i64,
    /// Size ceiling for item content, enforced before persistence
    pub max_file_bytes: usize,
    /// Text shorter than this skips the classifier entirely
    pub classify_min_chars: usize,
    /// How long a publish waits on the classifier before falling back
    pub classify_timeout: Duration,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            default_ttl_minutes: 30,
            max_file_bytes: 2 * 1024 * 1024,
            classify_min_chars: 50,
            classify_timeout: Duration::from_secs(5),
        }
    }
}

/// Service for the drop zone's publish/list/clear operations
pub struct DropService {
    repository: Arc<dyn ItemRepository + Send + Sync>,
    classifier: Arc<dyn ContentClassifier>,
    event_bus: EventBus,
    clock: Arc<dyn Clock>,
    config: DropConfig,
}

impl DropService {
    pub fn new(
        repository: Arc<dyn ItemRepository + Send + Sync>,
        classifier: Arc<dyn ContentClassifier>,
        event_bus: EventBus,
        clock: Arc<dyn Clock>,
        config: DropConfig,
    ) -> Self {
        Self {
            repository,
            classifier,
            event_bus,
            clock,
            config,
        }
    }

    /// Publishes a new item to the room and notifies its subscribers.
    ///
    /// Oversized content is rejected before anything is persisted. For text
    /// posts the classifier may refine kind/content/summary; every classifier
    /// failure (error, timeout, not configured) silently falls back to the
    /// local heuristic and never fails the publish.
    #[instrument(skip(self, request))]
    pub async fn publish(
        &self,
        room_id: &str,
        request: PublishRequest,
    ) -> Result<ItemResponse, AppError> {
        let ttl_minutes = request
            .ttl_minutes
            .unwrap_or(self.config.default_ttl_minutes);
        if ttl_minutes <= 0 {
            return Err(AppError::BadRequest(
                "ttl_minutes must be at least 1".to_string(),
            ));
        }

        if request.content.len() > self.config.max_file_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Content is {}, the limit is {}. Share a smaller file or trim the text.",
                format_human_size(request.content.len()),
                format_human_size(self.config.max_file_bytes),
            )));
        }

        let (kind, content, file_meta, summary) = self.shape_item(&request).await?;

        let item = ItemModel::new(
            room_id.to_string(),
            kind,
            content,
            file_meta,
            summary,
            self.clock.now(),
            ttl_minutes,
        );

        self.repository.insert(&item).await?;

        self.event_bus
            .emit_to_room(
                room_id,
                RoomEvent::ItemPublished {
                    item_id: item.id.clone(),
                    kind: item.kind,
                },
            )
            .await;

        info!(
            item_id = %item.id,
            room_id = %room_id,
            kind = %item.kind,
            ttl_minutes = ttl_minutes,
            "Item published"
        );

        Ok(item.into())
    }

    /// Lists the caller's room: non-expired items only, newest first
    #[instrument(skip(self))]
    pub async fn list(&self, room_id: &str) -> Result<Vec<ItemResponse>, AppError> {
        let items = self
            .repository
            .list_room(room_id, self.clock.now())
            .await?;

        debug!(room_id = %room_id, count = items.len(), "Items listed");
        Ok(items.into_iter().map(ItemResponse::from).collect())
    }

    /// Empties the caller's room and notifies its subscribers
    #[instrument(skip(self))]
    pub async fn clear(&self, room_id: &str) -> Result<u64, AppError> {
        let removed = self.repository.clear_room(room_id).await?;

        self.event_bus
            .emit_to_room(room_id, RoomEvent::RoomCleared { removed })
            .await;

        info!(room_id = %room_id, removed = removed, "Room cleared");
        Ok(removed)
    }

    /// Decides kind, final content, file details and summary for the item.
    async fn shape_item(
        &self,
        request: &PublishRequest,
    ) -> Result<(ItemKind, String, Option<FileMeta>, Option<String>), AppError> {
        // File uploads carry their kind; the classifier only sees text
        if request.file_name.is_some() || request.kind == Some(ItemKind::File) {
            let file_name = request.file_name.clone().ok_or_else(|| {
                AppError::BadRequest("File posts need a file_name".to_string())
            })?;
            let file_size = request.file_size.clone().unwrap_or_else(|| {
                // content is base64; the raw payload is ~3/4 of it
                format_human_size(request.content.len() * 3 / 4)
            });
            let mime_type = request
                .mime_type
                .clone()
                .unwrap_or_else(|| "application/octet-stream".to_string());

            return Ok((
                ItemKind::File,
                request.content.clone(),
                Some(FileMeta {
                    file_name,
                    file_size,
                    mime_type,
                }),
                None,
            ));
        }

        // The caller already knows it is posting a link or a snippet
        if let Some(kind @ (ItemKind::Link | ItemKind::Code)) = request.kind {
            return Ok((kind, request.content.clone(), None, None));
        }

        let (kind, content, summary) = self.classify_text(&request.content).await;
        Ok((kind, content, None, summary))
    }

    /// Runs the classifier with a timeout; any failure degrades to the local
    /// heuristic with verbatim content and no summary. A result arriving
    /// after the timeout is dropped.
    async fn classify_text(&self, text: &str) -> (ItemKind, String, Option<String>) {
        if text.chars().count() > self.config.classify_min_chars {
            match tokio::time::timeout(self.config.classify_timeout, self.classifier.analyze(text))
                .await
            {
                Ok(Ok(classification)) => {
                    return (
                        classification.kind,
                        classification.cleaned_content,
                        classification.summary,
                    );
                }
                Ok(Err(e)) => {
                    debug!(error = %e, "Classifier failed, using heuristic");
                }
                Err(_) => {
                    warn!(
                        timeout_ms = self.config.classify_timeout.as_millis() as u64,
                        "Classifier timed out, using heuristic"
                    );
                }
            }
        }

        (detect_kind(text), text.to_string(), None)
    }
}
