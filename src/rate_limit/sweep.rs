use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

use super::store::RateLimitStore;

/// Background task that periodically evicts expired rate counter entries.
///
/// Keeps the store bounded by the number of distinct recently-active
/// clients. Fire-and-forget: spawned at startup, aborted at shutdown.
pub struct SweepTask {
    store: Arc<RateLimitStore>,
    period: Duration,
}

impl SweepTask {
    pub fn new(store: Arc<RateLimitStore>, period: Duration) -> Self {
        Self { store, period }
    }

    pub async fn run(self) {
        tracing::info!(
            period_secs = self.period.as_secs(),
            "Starting rate limit sweep task"
        );

        let mut interval = time::interval(self.period);

        loop {
            interval.tick().await;

            let removed = self.store.sweep(Utc::now()).await;
            if removed > 0 {
                tracing::debug!(
                    removed = removed,
                    remaining = self.store.active_keys().await,
                    "Evicted expired rate limit entries"
                );
            }
        }
    }
}
