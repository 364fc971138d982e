use axum::routing::get;
use axum::Router;

use crate::handlers::survey;
use crate::state::AppState;

/// Survey model routes mounted at `/survey`.
///
/// ```text
/// GET  /    -> get_survey
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(survey::get_survey))
}
