use std::sync::Arc;
use std::time::Duration;

use flash_events::{ChangeBus, LiveQuery, PgSnapshotSource};

use crate::config::ServerConfig;
use crate::sessions::SessionStore;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: flash_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (admin live feeds).
    pub ws_manager: Arc<WsManager>,
    /// Respondent sessions.
    pub sessions: Arc<SessionStore>,
    /// Table change notifications, fed by the database listener.
    pub change_bus: Arc<ChangeBus>,
    /// Snapshot subscriptions over `change_bus`.
    pub live_query: LiveQuery,
}

impl AppState {
    /// Wire up state backed by `pool`, with fresh in-memory components.
    pub fn new(pool: flash_db::DbPool, config: ServerConfig) -> Self {
        let change_bus = Arc::new(ChangeBus::default());
        let live_query = LiveQuery::new(
            Arc::new(PgSnapshotSource::new(pool.clone())),
            Arc::clone(&change_bus),
        );
        let sessions = Arc::new(SessionStore::new(Duration::from_secs(
            config.session_ttl_secs,
        )));

        Self {
            pool,
            config: Arc::new(config),
            ws_manager: Arc::new(WsManager::new()),
            sessions,
            change_bus,
            live_query,
        }
    }
}
