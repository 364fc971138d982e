//! WebSocket infrastructure for the admin live feed.
//!
//! Provides connection management, heartbeat monitoring, and the HTTP
//! upgrade handler that binds one live query subscription to one socket.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::{live_feed, live_message, LiveParams};
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
