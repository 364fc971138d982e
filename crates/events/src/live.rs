//! Live queries over the record tables.
//!
//! A [`LiveQuery`] subscription delivers the full, newest-first contents of
//! a table once on subscribe and again after every change to that table.
//! Changes are not diffed: each delivery is a complete refetch through a
//! [`SnapshotSource`]. A failed fetch is delivered as a [`QueryError`] and
//! the subscription keeps running.

use std::sync::Arc;

use async_trait::async_trait;
use flash_core::table::Table;
use flash_db::models::submission::Submission;
use flash_db::models::waitlist::WaitlistEntry;
use flash_db::repositories::{SubmissionRepo, WaitlistRepo};
use flash_db::{DbPool, QueryError};
use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::bus::{ChangeBus, TableChange};

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// The complete contents of one table, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "table", content = "rows", rename_all = "snake_case")]
pub enum Snapshot {
    Submissions(Vec<Submission>),
    Waitlist(Vec<WaitlistEntry>),
}

impl Snapshot {
    pub fn table(&self) -> Table {
        match self {
            Self::Submissions(_) => Table::Submissions,
            Self::Waitlist(_) => Table::Waitlist,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Submissions(rows) => rows.len(),
            Self::Waitlist(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where snapshots come from.
#[async_trait]
pub trait SnapshotSource: Send + Sync + 'static {
    async fn snapshot(&self, table: Table) -> Result<Snapshot, QueryError>;
}

/// Reads snapshots straight from PostgreSQL.
#[derive(Clone)]
pub struct PgSnapshotSource {
    pool: DbPool,
}

impl PgSnapshotSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnapshotSource for PgSnapshotSource {
    async fn snapshot(&self, table: Table) -> Result<Snapshot, QueryError> {
        let snapshot = match table {
            Table::Submissions => Snapshot::Submissions(SubmissionRepo::list_all(&self.pool).await?),
            Table::Waitlist => Snapshot::Waitlist(WaitlistRepo::list_all(&self.pool).await?),
        };
        Ok(snapshot)
    }
}

// ---------------------------------------------------------------------------
// LiveQuery
// ---------------------------------------------------------------------------

/// Factory for table subscriptions. Cheap to clone.
#[derive(Clone)]
pub struct LiveQuery {
    source: Arc<dyn SnapshotSource>,
    bus: Arc<ChangeBus>,
}

impl LiveQuery {
    pub fn new(source: Arc<dyn SnapshotSource>, bus: Arc<ChangeBus>) -> Self {
        Self { source, bus }
    }

    /// One-off fetch without subscribing.
    pub async fn fetch(&self, table: Table) -> Result<Snapshot, QueryError> {
        self.source.snapshot(table).await
    }

    /// Watch `table`, invoking `callback` with the initial snapshot and
    /// after every subsequent change.
    ///
    /// Deliveries for one subscription never overlap and arrive in fetch
    /// order. After [`Subscription::unsubscribe`] or drop, no further
    /// callbacks are made.
    pub fn subscribe<F>(&self, table: Table, mut callback: F) -> Subscription
    where
        F: FnMut(Result<Snapshot, QueryError>) + Send + 'static,
    {
        // Subscribe before the initial fetch so no change slips in between.
        let mut changes = self.bus.subscribe();
        let source = Arc::clone(&self.source);
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            loop {
                let result = tokio::select! {
                    _ = token.cancelled() => return,
                    result = source.snapshot(table) => result,
                };
                if token.is_cancelled() {
                    return;
                }
                if let Err(e) = &result {
                    tracing::warn!(table = %table, error = %e, "Live query fetch failed");
                }
                callback(result);

                // Wait for a change to this table.
                loop {
                    let received = tokio::select! {
                        _ = token.cancelled() => return,
                        received = changes.recv() => received,
                    };
                    let refetch = match received {
                        Ok(change) => change.table == table,
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!(table = %table, skipped = n, "Live query lagged, refetching");
                            true
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::debug!(table = %table, "Change bus closed, live query ending");
                            return;
                        }
                    };
                    if refetch {
                        // Changes queued behind this one are covered by the same refetch.
                        drain_pending(&mut changes);
                        break;
                    }
                }
            }
        });

        Subscription {
            table,
            cancel,
            handle: Some(handle),
        }
    }
}

/// Consume every change already queued.
fn drain_pending(changes: &mut broadcast::Receiver<TableChange>) {
    loop {
        match changes.try_recv() {
            Ok(_) | Err(TryRecvError::Lagged(_)) => {}
            Err(TryRecvError::Empty | TryRecvError::Closed) => return,
        }
    }
}

/// Handle for an active live query. Dropping it stops delivery.
pub struct Subscription {
    table: Table,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn table(&self) -> Table {
        self.table
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop delivery and wait for the background task to finish, so no
    /// callback runs after this returns.
    pub async fn unsubscribe(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
