//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly; no server or database is involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use flash_api::error::AppError;
use flash_core::error::CoreError;
use flash_db::QueryError;
use http_body_util::BodyExt;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Submission",
        id: "42".into(),
    });

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Submission with id 42 not found");
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn missing_answers_return_422_with_ids() {
    let err = AppError::Core(CoreError::MissingAnswers(vec!["q4".into(), "q23".into()]));

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "MISSING_ANSWERS");
    assert_eq!(json["details"]["missing"], serde_json::json!(["q4", "q23"]));
}

#[tokio::test]
async fn schema_missing_returns_503_with_setup_script() {
    let err = AppError::from(QueryError::new(
        flash_db::SCHEMA_MISSING,
        "relation \"submissions\" does not exist",
    ));

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "SCHEMA_MISSING");
    assert_eq!(json["details"]["setup_script"], flash_db::SETUP_SCRIPT);
}

#[tokio::test]
async fn other_query_errors_are_sanitized() {
    let err = AppError::from(QueryError::new("57014", "canceling statement due to timeout"));

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "QUERY_FAILED");
    assert!(!json["error"].as_str().unwrap().contains("canceling"));
}

#[tokio::test]
async fn pool_timeout_returns_503() {
    let (status, json) = error_to_response(AppError::from(sqlx::Error::PoolTimedOut)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "DATABASE_UNAVAILABLE");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, _) = error_to_response(AppError::from(sqlx::Error::RowNotFound)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn internal_error_hides_message() {
    let (status, json) =
        error_to_response(AppError::InternalError("secret details".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Core(CoreError::Conflict("Submission in progress".into()));
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}
