//! Handlers for respondent survey sessions.
//!
//! A session is the server-held [`SurveyFlow`] for one respondent. Every
//! endpoint returns the updated [`SessionView`] so the client can render
//! the current screen without keeping state of its own.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use flash_core::error::CoreError;
use flash_core::flow::{Advance, SurveyFlow};
use flash_core::form::FormData;
use flash_core::survey::{self, Section};
use flash_core::validation::validate_submission;
use flash_db::models::submission::Submission;
use flash_db::repositories::SubmissionRepo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Shown to the respondent when the final write fails.
const SUBMIT_FAILED_MESSAGE: &str = "Error submitting form. Please try again.";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `PUT /sessions/{id}/answers/{qid}`.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub value: String,
}

/// Request body for `POST /sessions/{id}/answers/{qid}/toggle`.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub option: String,
}

/// Everything the client needs to render a session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    #[serde(flatten)]
    pub flow: SurveyFlow,
    pub section_count: usize,
    pub progress_percent: f64,
    pub is_first_section: bool,
    pub is_last_section: bool,
    /// The section on screen, while on the survey screen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<&'static Section>,
}

impl SessionView {
    pub fn new(id: Uuid, flow: SurveyFlow) -> Self {
        let section = (flow.screen() == flash_core::flow::Screen::Survey)
            .then(|| flow.current_section());
        Self {
            id,
            section_count: survey::section_count(),
            progress_percent: flow.progress_percent(),
            is_first_section: flow.is_first_section(),
            is_last_section: flow.is_last_section(),
            section,
            flow,
        }
    }
}

/// What an advance did.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdvanceOutcome {
    /// Required questions are unanswered; nothing moved or was written.
    Blocked {
        missing: Vec<&'static str>,
        focus: &'static str,
    },
    Moved {
        section_index: usize,
    },
    Submitted {
        submission: Submission,
    },
    /// A submission for this session is already in flight.
    Busy,
}

#[derive(Debug, Serialize)]
pub struct AdvanceResponse {
    pub outcome: AdvanceOutcome,
    pub session: SessionView,
}

type SessionResponse = AppResult<Json<DataResponse<SessionView>>>;

fn view(id: Uuid, flow: SurveyFlow) -> Json<DataResponse<SessionView>> {
    Json(DataResponse {
        data: SessionView::new(id, flow),
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions
///
/// Open a session on the intro screen.
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<DataResponse<SessionView>>) {
    let (id, flow) = state.sessions.create().await;
    tracing::info!(session_id = %id, "Survey session created");
    (StatusCode::CREATED, view(id, flow))
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> SessionResponse {
    let flow = state.sessions.get(id).await?;
    Ok(view(id, flow))
}

/// POST /api/v1/sessions/{id}/start
pub async fn start(State(state): State<AppState>, Path(id): Path<Uuid>) -> SessionResponse {
    let flow = state
        .sessions
        .update(id, |flow| flow.start().map(|()| flow.clone()))
        .await??;
    Ok(view(id, flow))
}

/// PUT /api/v1/sessions/{id}/answers/{qid}
pub async fn answer(
    State(state): State<AppState>,
    Path((id, question_id)): Path<(Uuid, String)>,
    Json(input): Json<AnswerRequest>,
) -> SessionResponse {
    let flow = state
        .sessions
        .update(id, |flow| {
            flow.answer_text(&question_id, input.value)
                .map(|()| flow.clone())
        })
        .await??;
    Ok(view(id, flow))
}

/// POST /api/v1/sessions/{id}/answers/{qid}/toggle
pub async fn toggle(
    State(state): State<AppState>,
    Path((id, question_id)): Path<(Uuid, String)>,
    Json(input): Json<ToggleRequest>,
) -> SessionResponse {
    let flow = state
        .sessions
        .update(id, |flow| {
            flow.toggle_option(&question_id, &input.option)?;
            Ok::<_, CoreError>(flow.clone())
        })
        .await??;
    Ok(view(id, flow))
}

/// POST /api/v1/sessions/{id}/advance
///
/// Validate the current section, then move on. On the last section the
/// answers are written as a submission.
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<AdvanceResponse>>> {
    let step = state.sessions.update(id, |flow| flow.advance()).await??;

    let outcome = match step {
        Advance::Blocked { missing, focus } => {
            tracing::debug!(session_id = %id, ?missing, "Advance blocked");
            AdvanceOutcome::Blocked { missing, focus }
        }
        Advance::Moved { section_index } => AdvanceOutcome::Moved { section_index },
        Advance::Busy => AdvanceOutcome::Busy,
        Advance::Submit(form) => AdvanceOutcome::Submitted {
            submission: submit(&state, id, form).await?,
        },
    };

    let flow = flow_after_advance(state.sessions.get(id).await, &outcome)?;
    Ok(Json(DataResponse {
        data: AdvanceResponse {
            outcome,
            session: SessionView::new(id, flow),
        },
    }))
}

/// POST /api/v1/sessions/{id}/retreat
pub async fn retreat(State(state): State<AppState>, Path(id): Path<Uuid>) -> SessionResponse {
    let flow = state
        .sessions
        .update(id, |flow| flow.retreat().map(|_| flow.clone()))
        .await??;
    Ok(view(id, flow))
}

/// POST /api/v1/sessions/{id}/home
///
/// Back to the intro screen (the header logo).
pub async fn home(State(state): State<AppState>, Path(id): Path<Uuid>) -> SessionResponse {
    let flow = state
        .sessions
        .update(id, |flow| flow.home().map(|()| flow.clone()))
        .await??;
    Ok(view(id, flow))
}

/// DELETE /api/v1/sessions/{id}
///
/// Abandon the session. Its answers are discarded.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.sessions.remove(id).await {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id: id.to_string(),
        }));
    }
    tracing::info!(session_id = %id, "Survey session abandoned");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/{id}/admin
///
/// Show the admin login screen (the footer link).
pub async fn open_admin(State(state): State<AppState>, Path(id): Path<Uuid>) -> SessionResponse {
    let flow = state
        .sessions
        .update(id, |flow| {
            flow.open_admin_login();
            flow.clone()
        })
        .await?;
    Ok(view(id, flow))
}

/// DELETE /api/v1/sessions/{id}/admin
///
/// Leave the admin screens and return to the intro.
pub async fn leave_admin(State(state): State<AppState>, Path(id): Path<Uuid>) -> SessionResponse {
    let flow = state
        .sessions
        .update(id, |flow| {
            flow.leave_admin();
            flow.clone()
        })
        .await?;
    Ok(view(id, flow))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The session state to report after an advance. A submission that was
/// written still reports success when the session was swept meanwhile.
fn flow_after_advance(
    current: Result<SurveyFlow, CoreError>,
    outcome: &AdvanceOutcome,
) -> AppResult<SurveyFlow> {
    match (current, outcome) {
        (Ok(flow), _) => Ok(flow),
        (Err(_), AdvanceOutcome::Submitted { .. }) => Ok(SurveyFlow::completed()),
        (Err(e), _) => Err(e.into()),
    }
}

/// Write the session's answers and record the outcome on the session.
///
/// Runs on its own task so the insert and the session update complete even
/// if the client disconnects or the request times out. The session lock is
/// not held while the insert runs.
async fn submit(state: &AppState, id: Uuid, form: FormData) -> AppResult<Submission> {
    let state = state.clone();
    let task = tokio::spawn(async move {
        let result = match validate_submission(&form) {
            Ok(()) => SubmissionRepo::insert(&state.pool, &form)
                .await
                .map_err(AppError::from),
            Err(e) => Err(AppError::from(e)),
        };

        let recorded = match &result {
            Ok(submission) => {
                tracing::info!(session_id = %id, submission_id = %submission.id, "Survey submitted");
                state.sessions.update(id, |flow| flow.submission_succeeded()).await
            }
            Err(e) => {
                tracing::warn!(session_id = %id, error = %e, "Survey submission failed");
                let message = match e {
                    AppError::Core(CoreError::MissingAnswers(_)) => {
                        "Please answer all required questions"
                    }
                    _ => SUBMIT_FAILED_MESSAGE,
                };
                state
                    .sessions
                    .update(id, |flow| flow.submission_failed(message))
                    .await
            }
        };
        if recorded.is_err() {
            tracing::warn!(session_id = %id, "Session expired before the submission finished");
        }

        result
    });

    task.await
        .map_err(|e| AppError::InternalError(format!("Submission task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;
    use flash_core::flow::Screen;

    use super::*;

    fn gone() -> Result<SurveyFlow, CoreError> {
        Err(CoreError::NotFound {
            entity: "Session",
            id: Uuid::new_v4().to_string(),
        })
    }

    #[test]
    fn written_submission_survives_a_swept_session() {
        let outcome = AdvanceOutcome::Submitted {
            submission: Submission {
                id: Uuid::new_v4(),
                created_at: Utc::now(),
                data: sqlx::types::Json(FormData::new()),
            },
        };
        let flow = flow_after_advance(gone(), &outcome).unwrap();
        assert_eq!(flow.screen(), Screen::Success);
        assert!(flow.form().is_empty());
    }

    #[test]
    fn swept_session_is_not_found_otherwise() {
        let outcome = AdvanceOutcome::Moved { section_index: 1 };
        assert_matches!(
            flow_after_advance(gone(), &outcome),
            Err(AppError::Core(CoreError::NotFound { .. }))
        );
    }
}
