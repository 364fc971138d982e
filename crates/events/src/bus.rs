//! In-process change bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`ChangeBus`] is the publish/subscribe hub for [`TableChange`]s. It is
//! designed to be shared via `Arc<ChangeBus>` across the application.

use chrono::Utc;
use flash_core::table::Table;
use flash_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// TableChange
// ---------------------------------------------------------------------------

/// The kind of write that touched a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
    /// Notifications may have been missed; subscribers should refetch.
    Resync,
}

/// A write to one of the record tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableChange {
    pub table: Table,
    pub op: ChangeOp,
    /// When the change was observed (UTC).
    pub at: Timestamp,
}

/// Shape of the JSON payload the database triggers send.
#[derive(Deserialize)]
struct NotificationPayload {
    table: Table,
    op: ChangeOp,
}

impl TableChange {
    pub fn new(table: Table, op: ChangeOp) -> Self {
        Self {
            table,
            op,
            at: Utc::now(),
        }
    }

    /// A change that tells subscribers to refetch `table` unconditionally.
    pub fn resync(table: Table) -> Self {
        Self::new(table, ChangeOp::Resync)
    }

    /// Parse a `table_changes` notification payload,
    /// e.g. `{"table":"waitlist","op":"INSERT"}`.
    pub fn from_payload(payload: &str) -> Result<Self, serde_json::Error> {
        let parsed: NotificationPayload = serde_json::from_str(payload)?;
        Ok(Self::new(parsed.table, parsed.op))
    }
}

// ---------------------------------------------------------------------------
// ChangeBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out change bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`TableChange`].
///
/// # Usage
///
/// ```rust
/// use flash_core::table::Table;
/// use flash_events::bus::{ChangeBus, ChangeOp, TableChange};
///
/// let bus = ChangeBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(TableChange::new(Table::Waitlist, ChangeOp::Insert));
/// ```
pub struct ChangeBus {
    sender: broadcast::Sender<TableChange>,
}

impl ChangeBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a change to all current subscribers.
    ///
    /// If there are no active subscribers the change is silently dropped.
    pub fn publish(&self, change: TableChange) {
        // A send error only means there are no receivers.
        let _ = self.sender.send(change);
    }

    /// Subscribe to all changes published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<TableChange> {
        self.sender.subscribe()
    }

    /// Number of live receivers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
