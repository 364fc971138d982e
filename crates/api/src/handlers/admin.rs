//! Handlers for the admin dashboard.
//!
//! Everything except `login` requires an admin token.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use flash_core::error::CoreError;
use flash_core::export;
use flash_core::review::{self, SectionAnswers};
use flash_core::table::Table;
use flash_core::types::{DbId, Timestamp};
use flash_db::models::submission::Submission;
use flash_db::models::waitlist::WaitlistEntry;
use flash_db::repositories::{SubmissionRepo, WaitlistRepo};
use flash_events::Snapshot;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::auth::ROLE_ADMIN;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Respondent session showing the login screen, moved to the dashboard
    /// on success.
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Query parameters for the admin lists.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Case-insensitive substring filter.
    pub q: Option<String>,
}

impl ListParams {
    fn needle(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// A submission with its answers grouped for reading.
#[derive(Debug, Serialize)]
pub struct SubmissionDetail {
    pub id: DbId,
    pub created_at: Timestamp,
    pub sections: Vec<SectionAnswers>,
}

#[derive(Debug, Serialize)]
pub struct SetupScript {
    pub setup_script: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/login
///
/// Check the configured admin credential and issue an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let admin = &state.config.admin;

    let password_ok = verify_password(&input.password, &admin.password_hash)
        .map_err(|e| AppError::InternalError(format!("Admin password hash is invalid: {e}")))?;

    if input.username != admin.username || !password_ok {
        tracing::warn!(username = %input.username, "Admin login rejected");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    if let Some(session_id) = input.session_id {
        state
            .sessions
            .update(session_id, |flow| flow.admin_authenticated())
            .await??;
    }

    let access_token = generate_access_token(&admin.username, ROLE_ADMIN, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;
    tracing::info!(username = %admin.username, "Admin logged in");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
    }))
}

/// GET /api/v1/admin/submissions?q=
///
/// All submissions, newest first, optionally filtered by answer text.
pub async fn list_submissions(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Submission>>>> {
    let rows = match params.needle() {
        Some(needle) => SubmissionRepo::search(&state.pool, needle).await?,
        None => SubmissionRepo::list_all(&state.pool).await?,
    };
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/admin/submissions/{id}
///
/// One submission, grouped by survey section with placeholders for
/// unanswered questions.
pub async fn get_submission(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SubmissionDetail>>> {
    let submission = SubmissionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "Submission",
            id: id.to_string(),
        })?;

    Ok(Json(DataResponse {
        data: SubmissionDetail {
            id: submission.id,
            created_at: submission.created_at,
            sections: review::group_by_section(submission.answers()),
        },
    }))
}

/// GET /api/v1/admin/waitlist?q=
///
/// All waitlist entries, newest first, optionally filtered by name, email
/// or WhatsApp number.
pub async fn list_waitlist(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<WaitlistEntry>>>> {
    let rows = match params.needle() {
        Some(needle) => WaitlistRepo::search(&state.pool, needle).await?,
        None => WaitlistRepo::list_all(&state.pool).await?,
    };
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/admin/submissions/export
pub async fn export_submissions(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Response> {
    export_table(&state, Table::Submissions).await
}

/// GET /api/v1/admin/waitlist/export
pub async fn export_waitlist(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Response> {
    export_table(&state, Table::Waitlist).await
}

/// GET /api/v1/admin/setup-script
///
/// The SQL that creates the tables, for operators who do not let the
/// service run migrations.
pub async fn setup_script(RequireAdmin(_admin): RequireAdmin) -> Json<DataResponse<SetupScript>> {
    Json(DataResponse {
        data: SetupScript {
            setup_script: flash_db::SETUP_SCRIPT,
        },
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Render the same snapshot the live feed shows for `table` as a CSV
/// download.
async fn export_table(state: &AppState, table: Table) -> AppResult<Response> {
    let snapshot = state.live_query.fetch(table).await?;
    let count = snapshot.len();
    let body = match &snapshot {
        Snapshot::Submissions(rows) => {
            export::submissions_csv(rows.iter().map(Submission::as_export_row))
        }
        Snapshot::Waitlist(rows) => {
            export::waitlist_csv(rows.iter().map(WaitlistEntry::as_export_row))
        }
    };

    let filename = export::export_filename(table.export_prefix(), Utc::now().date_naive());
    tracing::info!(table = %table, count, filename = %filename, "CSV export");

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}
