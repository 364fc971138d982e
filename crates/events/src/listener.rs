//! PostgreSQL `LISTEN`/`NOTIFY` bridge.
//!
//! [`ChangeListener`] holds a dedicated connection listening on
//! [`CHANGE_CHANNEL`] and republishes every trigger notification onto the
//! [`ChangeBus`]. If the connection drops it reconnects after a delay and
//! publishes a resync for every table, since notifications sent while it
//! was away are lost.

use std::sync::Arc;
use std::time::Duration;

use flash_core::table::Table;
use flash_db::{DbPool, CHANGE_CHANNEL};
use sqlx::postgres::PgListener;
use tokio_util::sync::CancellationToken;

use crate::bus::{ChangeBus, TableChange};

/// Delay before reconnecting after the listener connection fails.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Background service forwarding database change notifications to the bus.
pub struct ChangeListener {
    pool: DbPool,
    bus: Arc<ChangeBus>,
    reconnect_delay: Duration,
}

impl ChangeListener {
    pub fn new(pool: DbPool, bus: Arc<ChangeBus>) -> Self {
        Self {
            pool,
            bus,
            reconnect_delay: RECONNECT_DELAY,
        }
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Run the listener until `cancel` is triggered.
    pub async fn run(self, cancel: CancellationToken) {
        let mut reconnecting = false;

        loop {
            match self.listen(&cancel, reconnecting).await {
                Ok(()) => {
                    tracing::info!("Change listener cancelled");
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        retry_in_ms = self.reconnect_delay.as_millis() as u64,
                        "Change listener connection failed"
                    );
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Change listener cancelled");
                    break;
                }
                _ = tokio::time::sleep(self.reconnect_delay) => {}
            }
            reconnecting = true;
        }
    }

    /// Listen on one connection. Returns `Ok` only when cancelled.
    async fn listen(
        &self,
        cancel: &CancellationToken,
        reconnecting: bool,
    ) -> Result<(), sqlx::Error> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(CHANGE_CHANNEL).await?;
        tracing::info!(channel = CHANGE_CHANNEL, "Listening for table changes");

        if reconnecting {
            for table in Table::ALL {
                self.bus.publish(TableChange::resync(table));
            }
        }

        loop {
            // `try_recv` reports a lost connection as `None` instead of
            // reconnecting silently, so the resync above is not skipped.
            let notification = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                notification = listener.try_recv() => notification?,
            };
            let Some(notification) = notification else {
                return Err(sqlx::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionAborted,
                    "listener connection lost",
                )));
            };

            match TableChange::from_payload(notification.payload()) {
                Ok(change) => {
                    tracing::debug!(table = %change.table, op = ?change.op, "Table changed");
                    self.bus.publish(change);
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        payload = notification.payload(),
                        "Ignoring malformed change notification"
                    );
                }
            }
        }
    }
}
