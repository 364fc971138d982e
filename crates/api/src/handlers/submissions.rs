//! Handler for direct survey submissions.
//!
//! Clients that keep their own form state post the complete answer set
//! here. The session API in [`super::sessions`] is the server-driven
//! alternative.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use flash_core::validation::validate_submission;
use flash_db::models::submission::{CreateSubmission, Submission};
use flash_db::repositories::SubmissionRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/submissions
///
/// Validate the whole answer set and store it. Missing required answers
/// are rejected with 422 and `details.missing`.
pub async fn create_submission(
    State(state): State<AppState>,
    Json(input): Json<CreateSubmission>,
) -> AppResult<(StatusCode, Json<DataResponse<Submission>>)> {
    validate_submission(&input.data)?;

    let submission = SubmissionRepo::insert(&state.pool, &input.data).await?;
    tracing::info!(submission_id = %submission.id, "Survey submitted");

    Ok((StatusCode::CREATED, Json(DataResponse { data: submission })))
}
