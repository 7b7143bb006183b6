use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, error, info, instrument};

use super::repository::ItemRepository;
use crate::clock::Clock;
use crate::event::{EventBus, RoomEvent};

/// Configuration for the expired-item sweep task
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// How often to physically drop expired items
    pub sweep_interval: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(5 * 60),
        }
    }
}

/// Starts the background task that periodically drops expired items.
///
/// This is storage hygiene only: reads already hide expired items, so
/// correctness never depends on this task running. Rooms that lose items get
/// an ItemsExpired nudge so idle clients refresh their countdown views.
#[instrument(skip(repository, event_bus, clock))]
pub async fn start_sweep_task(
    repository: Arc<dyn ItemRepository + Send + Sync>,
    event_bus: EventBus,
    clock: Arc<dyn Clock>,
    config: SweepConfig,
) {
    info!(
        sweep_interval_secs = config.sweep_interval.as_secs(),
        "Starting expired-item sweep task"
    );

    let mut sweep_interval = interval(config.sweep_interval);

    loop {
        sweep_interval.tick().await;

        match sweep_once(&repository, &event_bus, clock.now()).await {
            Ok(total) if total > 0 => {
                info!(removed = total, "Expired-item sweep completed");
            }
            Ok(_) => {
                debug!("No expired items to sweep");
            }
            Err(e) => {
                error!(error = %e, "Expired-item sweep failed");
            }
        }
    }
}

async fn sweep_once(
    repository: &Arc<dyn ItemRepository + Send + Sync>,
    event_bus: &EventBus,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<u64, crate::shared::AppError> {
    let removed_by_room = repository.remove_expired(now).await?;

    let mut total = 0;
    for (room_id, removed) in removed_by_room {
        total += removed;
        event_bus
            .emit_to_room(&room_id, RoomEvent::ItemsExpired { removed })
            .await;
    }

    Ok(total)
}
