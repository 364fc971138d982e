//! Route definitions for the admin dashboard.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;
use crate::ws;

/// Admin routes mounted at `/admin`.
///
/// All routes except `/login` require the `admin` role (enforced by
/// handler extractors).
///
/// ```text
/// POST /login                  -> login
/// GET  /submissions            -> list_submissions
/// GET  /submissions/export     -> export_submissions
/// GET  /submissions/{id}       -> get_submission
/// GET  /waitlist               -> list_waitlist
/// GET  /waitlist/export        -> export_waitlist
/// GET  /setup-script           -> setup_script
/// GET  /live                   -> live_feed (WebSocket)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::login))
        .route("/submissions", get(admin::list_submissions))
        .route("/submissions/export", get(admin::export_submissions))
        .route("/submissions/{id}", get(admin::get_submission))
        .route("/waitlist", get(admin::list_waitlist))
        .route("/waitlist/export", get(admin::export_waitlist))
        .route("/setup-script", get(admin::setup_script))
        .route("/live", get(ws::live_feed))
}
