use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dropzone::classify::{ContentClassifier, HttpClassifier, NoopClassifier};
use dropzone::clock::SystemClock;
use dropzone::event::{EventBus, SubscriptionRegistry};
use dropzone::item::repository::{
    InMemoryItemRepository, ItemRepository, PostgresItemRepository,
};
use dropzone::item::{self, SweepConfig};
use dropzone::network::{self, AddressRoomResolver};
use dropzone::shared::{AppConfig, AppState};
use dropzone::websockets::{
    self, ConnectionManager, InMemoryConnectionManager, WebSocketRoomSubscriber,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dropzone=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting drop zone server");

    let config = AppConfig::from_env();

    // Durable store when a database is configured, in-memory otherwise
    let item_repository: Arc<dyn ItemRepository + Send + Sync> = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url)
                .await
                .expect("Failed to connect to database");
            info!("Using PostgreSQL item store");
            Arc::new(PostgresItemRepository::new(pool))
        }
        None => {
            info!("DATABASE_URL not set, using in-memory item store");
            Arc::new(InMemoryItemRepository::new())
        }
    };

    // Classifier is optional; without it the local heuristic takes over
    let classifier: Arc<dyn ContentClassifier> = match &config.classifier_url {
        Some(endpoint) => {
            info!(endpoint = %endpoint, "Content classifier enabled");
            Arc::new(
                HttpClassifier::new(
                    endpoint.clone(),
                    config.classifier_api_key.clone(),
                    config.drop.classify_timeout,
                )
                .expect("Failed to build classifier client"),
            )
        }
        None => {
            info!("CLASSIFIER_URL not set, publishing with local heuristics only");
            Arc::new(NoopClassifier)
        }
    };

    let event_bus = EventBus::new();
    let connection_manager: Arc<dyn ConnectionManager> =
        Arc::new(InMemoryConnectionManager::new());
    let subscriptions = Arc::new(SubscriptionRegistry::new(
        event_bus.clone(),
        Arc::new(WebSocketRoomSubscriber::new(Arc::clone(
            &connection_manager,
        ))),
    ));
    let clock: Arc<SystemClock> = Arc::new(SystemClock);

    // Storage hygiene; reads already hide expired items
    tokio::spawn(item::start_sweep_task(
        Arc::clone(&item_repository),
        event_bus.clone(),
        clock.clone(),
        SweepConfig {
            sweep_interval: config.sweep_interval,
        },
    ));

    let app_state = AppState {
        item_repository,
        room_resolver: Arc::new(AddressRoomResolver::new()),
        classifier,
        connection_manager,
        event_bus,
        subscriptions,
        clock,
        drop_config: config.drop.clone(),
        refresh_interval: config.refresh_interval,
    };

    let app = Router::new()
        .route(
            "/items",
            post(item::publish_item)
                .get(item::list_items)
                .delete(item::clear_items),
        )
        .route("/network", get(network::network_status))
        .route("/ws", get(websockets::websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap();
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
