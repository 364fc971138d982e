use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use flash_core::error::CoreError;
use flash_db::QueryError;
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses of
/// the form `{ "error", "code", "details"? }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `flash_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Request body failed field validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// A structured query failure (live query or snapshot fetch).
    #[error("Query failed: {0}")]
    Query(QueryError),

    /// The `submissions` or `waitlist` table does not exist yet.
    #[error("Schema missing: {0}")]
    SchemaMissing(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let query_error = QueryError::from_sqlx(&err);
        if query_error.is_schema_missing() {
            AppError::SchemaMissing(query_error.message)
        } else {
            AppError::Database(err)
        }
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        if err.is_schema_missing() {
            AppError::SchemaMissing(err.message)
        } else {
            AppError::Query(err)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                    None,
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
                }
                CoreError::MissingAnswers(ids) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "MISSING_ANSWERS",
                    "Please answer all required questions".to_string(),
                    Some(json!({ "missing": ids })),
                ),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone(), None),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
                }
                CoreError::Forbidden(msg) => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone(), None)
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal_error()
                }
            },

            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "One or more fields are invalid".to_string(),
                Some(json!({ "fields": field_messages(errors) })),
            ),

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            AppError::Query(err) => {
                tracing::error!(code = %err.code, error = %err.message, "Query failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "QUERY_FAILED",
                    "The records could not be loaded".to_string(),
                    None,
                )
            }

            AppError::SchemaMissing(msg) => {
                tracing::warn!(error = %msg, "Database schema is missing");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    flash_db::SCHEMA_MISSING,
                    "Database tables are missing. Run the setup script to create them.".to_string(),
                    Some(json!({ "setup_script": flash_db::SETUP_SCRIPT })),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal_error()
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, axum::Json(body)).into_response()
    }
}

type ErrorParts = (StatusCode, &'static str, String, Option<Value>);

fn internal_error() -> ErrorParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
        None,
    )
}

/// Flatten validator errors into `{ field: [message, ...] }`.
fn field_messages(errors: &validator::ValidationErrors) -> Value {
    let fields: serde_json::Map<String, Value> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), json!(messages))
        })
        .collect();
    Value::Object(fields)
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Connection-level failures map to 503 so clients know to retry.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
            None,
        ),
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            tracing::error!(error = %err, "Database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "DATABASE_UNAVAILABLE",
                "The database is unavailable, please try again".to_string(),
                None,
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal_error()
        }
    }
}
