use axum::routing::post;
use axum::Router;

use crate::handlers::waitlist;
use crate::state::AppState;

/// Waitlist routes mounted at `/waitlist`.
///
/// ```text
/// POST /    -> join_waitlist
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(waitlist::join_waitlist))
}
