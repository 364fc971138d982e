//! Periodic eviction of idle respondent sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::sessions::SessionStore;

/// Upper bound on how often the sweeper runs.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Run the sweeper loop until `cancel` is triggered.
///
/// Sweeps every minute, or more often when the TTL is shorter than that.
pub async fn run(store: Arc<SessionStore>, cancel: CancellationToken) {
    let period = store.ttl().min(MAX_SWEEP_INTERVAL).max(Duration::from_secs(1));
    tracing::info!(
        ttl_secs = store.ttl().as_secs(),
        interval_secs = period.as_secs(),
        "Session sweeper started"
    );

    let mut interval = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                let evicted = store.sweep_expired().await;
                if evicted > 0 {
                    tracing::info!(evicted, "Evicted idle survey sessions");
                } else {
                    tracing::debug!("No idle survey sessions to evict");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn evicts_idle_sessions_and_stops_on_cancel() {
        let store = Arc::new(SessionStore::new(Duration::from_secs(5)));
        store.create().await;

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(Arc::clone(&store), cancel.clone()));

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(store.count().await, 0);

        cancel.cancel();
        handle.await.unwrap();
    }
}
