//! Handler for joining the waitlist.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use flash_db::models::waitlist::{CreateWaitlistEntry, WaitlistEntry};
use flash_db::repositories::WaitlistRepo;
use serde::Serialize;
use validator::Validate;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for a successful join.
#[derive(Debug, Serialize)]
pub struct JoinedWaitlist {
    pub joined: bool,
    pub entry: WaitlistEntry,
}

/// POST /api/v1/waitlist
///
/// All three fields are required. Fields are trimmed before validation.
pub async fn join_waitlist(
    State(state): State<AppState>,
    Json(input): Json<CreateWaitlistEntry>,
) -> AppResult<(StatusCode, Json<DataResponse<JoinedWaitlist>>)> {
    let input = input.normalized();
    input.validate()?;

    let entry = WaitlistRepo::insert(&state.pool, &input).await?;
    tracing::info!(entry_id = %entry.id, "Joined waitlist");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: JoinedWaitlist {
                joined: true,
                entry,
            },
        }),
    ))
}
