pub mod admin;
pub mod health;
pub mod sessions;
pub mod submissions;
pub mod survey;
pub mod waitlist;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /survey                                   static survey model (public)
/// /submissions                              submit complete answers (public)
/// /waitlist                                 join waitlist (public)
///
/// /sessions                                 create respondent session
/// /sessions/{id}                            get, abandon
/// /sessions/{id}/start                      intro -> survey
/// /sessions/{id}/answers/{qid}              set answer (PUT)
/// /sessions/{id}/answers/{qid}/toggle       toggle multi-select option
/// /sessions/{id}/advance                    next section or submit
/// /sessions/{id}/retreat                    previous section
/// /sessions/{id}/home                       back to intro
/// /sessions/{id}/admin                      open (POST) / leave (DELETE) admin screens
///
/// /admin/login                              credential check (public)
/// /admin/submissions                        list (admin only)
/// /admin/submissions/export                 CSV download
/// /admin/submissions/{id}                   detail grouped by section
/// /admin/waitlist                           list
/// /admin/waitlist/export                    CSV download
/// /admin/setup-script                       remediation SQL
/// /admin/live                               WebSocket live snapshots
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/survey", survey::router())
        .nest("/submissions", submissions::router())
        .nest("/waitlist", waitlist::router())
        .nest("/sessions", sessions::router())
        .nest("/admin", admin::router())
}
