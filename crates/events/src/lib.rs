//! Change notification and live query infrastructure.
//!
//! - [`ChangeBus`]: in-process publish/subscribe hub for [`TableChange`]s,
//!   backed by `tokio::sync::broadcast`.
//! - [`ChangeListener`]: background service bridging PostgreSQL
//!   `LISTEN table_changes` onto the bus.
//! - [`LiveQuery`]: delivers an ordered [`Snapshot`] of a table on
//!   subscribe and again after every change to it.

pub mod bus;
pub mod listener;
pub mod live;

pub use bus::{ChangeBus, ChangeOp, TableChange};
pub use listener::ChangeListener;
pub use live::{LiveQuery, PgSnapshotSource, Snapshot, SnapshotSource, Subscription};
