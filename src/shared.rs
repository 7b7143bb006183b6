use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::classify::ContentClassifier;
use crate::clock::Clock;
use crate::event::{EventBus, SubscriptionRegistry};
use crate::item::repository::ItemRepository;
use crate::item::service::DropConfig;
use crate::network::resolver::RoomResolver;
use crate::websockets::ConnectionManager;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub item_repository: Arc<dyn ItemRepository + Send + Sync>,
    pub room_resolver: Arc<dyn RoomResolver>,
    pub classifier: Arc<dyn ContentClassifier>,
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub event_bus: EventBus,
    pub subscriptions: Arc<SubscriptionRegistry>,
    pub clock: Arc<dyn Clock>,
    pub drop_config: DropConfig,
    /// Fallback re-fetch nudge interval for WebSocket clients
    pub refresh_interval: Duration,
}

impl AppState {
    /// Builds a [`crate::item::service::DropService`] over this state's
    /// repository, classifier and event bus.
    pub fn drop_service(&self) -> crate::item::service::DropService {
        crate::item::service::DropService::new(
            Arc::clone(&self.item_repository),
            Arc::clone(&self.classifier),
            self.event_bus.clone(),
            Arc::clone(&self.clock),
            self.drop_config.clone(),
        )
    }
}

/// Server configuration, read from the environment in `main`
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: Option<String>,
    pub classifier_url: Option<String>,
    pub classifier_api_key: Option<String>,
    pub drop: DropConfig,
    pub sweep_interval: Duration,
    pub refresh_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            database_url: None,
            classifier_url: None,
            classifier_api_key: None,
            drop: DropConfig::default(),
            sweep_interval: Duration::from_secs(5 * 60),
            refresh_interval: Duration::from_secs(10),
        }
    }
}

impl AppConfig {
    /// Reads configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mut drop = DropConfig::default();
        if let Some(ttl) = read_env_parsed::<i64>("DROPZONE_DEFAULT_TTL_MINUTES") {
            drop.default_ttl_minutes = ttl;
        }
        if let Some(max) = read_env_parsed::<usize>("DROPZONE_MAX_FILE_BYTES") {
            drop.max_file_bytes = max;
        }

        Self {
            bind_addr: std::env::var("DROPZONE_BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_url: std::env::var("DATABASE_URL").ok(),
            classifier_url: std::env::var("CLASSIFIER_URL").ok(),
            classifier_api_key: std::env::var("CLASSIFIER_API_KEY").ok(),
            drop,
            sweep_interval: read_env_parsed::<u64>("DROPZONE_SWEEP_INTERVAL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
            refresh_interval: read_env_parsed::<u64>("DROPZONE_REFRESH_INTERVAL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.refresh_interval),
        }
    }
}

fn read_env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Storage failures keep their detail in the logs; the client only
        // learns that the operation did not go through.
        let (status, error_message) = match self {
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage failure surfaced to client");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage is unavailable, nothing was shared. Please retry.".to_string(),
                )
            }
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
