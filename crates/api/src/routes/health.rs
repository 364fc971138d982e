use axum::extract::State;
use flash_core::table::Table;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Respondent sessions currently held in memory.
    pub active_sessions: usize,
    /// Open admin live feeds.
    pub live_connections: usize,
    /// Open live feeds per table.
    pub live_feeds: LiveFeeds,
}

#[derive(Serialize)]
pub struct LiveFeeds {
    pub submissions: usize,
    pub waitlist: usize,
}

/// GET /health -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = flash_db::health_check(&state.pool).await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        active_sessions: state.sessions.count().await,
        live_connections: state.ws_manager.connection_count().await,
        live_feeds: LiveFeeds {
            submissions: state.ws_manager.count_for_table(Table::Submissions).await,
            waitlist: state.ws_manager.count_for_table(Table::Waitlist).await,
        },
    })
}

/// Mount health check routes (root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
