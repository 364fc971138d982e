//! Route definitions for respondent survey sessions.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Session routes mounted at `/sessions`.
///
/// ```text
/// POST   /                             -> create_session
/// GET    /{id}                         -> get_session
/// DELETE /{id}                         -> delete_session
/// POST   /{id}/start                   -> start
/// PUT    /{id}/answers/{qid}           -> answer
/// POST   /{id}/answers/{qid}/toggle    -> toggle
/// POST   /{id}/advance                 -> advance
/// POST   /{id}/retreat                 -> retreat
/// POST   /{id}/home                    -> home
/// POST   /{id}/admin                   -> open_admin
/// DELETE /{id}/admin                   -> leave_admin
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(sessions::create_session))
        .route(
            "/{id}",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/{id}/start", post(sessions::start))
        .route("/{id}/answers/{qid}", put(sessions::answer))
        .route("/{id}/answers/{qid}/toggle", post(sessions::toggle))
        .route("/{id}/advance", post(sessions::advance))
        .route("/{id}/retreat", post(sessions::retreat))
        .route("/{id}/home", post(sessions::home))
        .route(
            "/{id}/admin",
            post(sessions::open_admin).delete(sessions::leave_admin),
        )
}
