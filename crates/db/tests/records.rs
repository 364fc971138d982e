//! Integration tests for the submission and waitlist repositories.
//!
//! Exercises the repository layer against a real database:
//! - Server-assigned ids and timestamps
//! - Newest-first ordering
//! - Case-insensitive search
//! - Structured errors when the schema is missing

use chrono::{SubsecRound, Utc};
use flash_core::form::{Answer, FormData};
use flash_db::models::waitlist::CreateWaitlistEntry;
use flash_db::repositories::{SubmissionRepo, WaitlistRepo};
use flash_db::QueryError;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn answers(location: &str) -> FormData {
    let mut form = FormData::new();
    form.set_text("q4", location);
    form.toggle_option("q7", "USDC");
    form
}

fn signup(name: &str, email: &str) -> CreateWaitlistEntry {
    CreateWaitlistEntry {
        name: name.to_string(),
        email: email.to_string(),
        whatsapp: "08010000000".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Submissions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn inserted_submission_is_listed_with_server_timestamp(pool: PgPool) {
    let before = Utc::now().trunc_subsecs(6);

    let created = SubmissionRepo::insert(&pool, &answers("Lagos - Mainland"))
        .await
        .unwrap();
    assert!(created.created_at >= before);
    assert_eq!(
        created.answers().get("q7"),
        Some(&Answer::Choices(vec!["USDC".into()]))
    );

    let all = SubmissionRepo::list_all(&pool).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, created.id);
    assert_eq!(all[0].answers(), created.answers());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submissions_are_listed_newest_first(pool: PgPool) {
    let first = SubmissionRepo::insert(&pool, &answers("Abuja")).await.unwrap();
    let second = SubmissionRepo::insert(&pool, &answers("Kano")).await.unwrap();

    let all = SubmissionRepo::list_all(&pool).await.unwrap();
    let ids: Vec<_> = all.iter().map(|s| s.id).collect();
    assert_eq!(ids, [second.id, first.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submission_search_is_case_insensitive(pool: PgPool) {
    SubmissionRepo::insert(&pool, &answers("Port Harcourt")).await.unwrap();
    SubmissionRepo::insert(&pool, &answers("Ibadan")).await.unwrap();

    let hits = SubmissionRepo::search(&pool, "harcourt").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(
        hits[0].answers().get("q4"),
        Some(&Answer::Text("Port Harcourt".into()))
    );

    let none = SubmissionRepo::search(&pool, "100%").await.unwrap();
    assert!(none.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_id_returns_none_for_unknown(pool: PgPool) {
    let found = SubmissionRepo::find_by_id(&pool, uuid::Uuid::new_v4())
        .await
        .unwrap();
    assert!(found.is_none());
}

// ---------------------------------------------------------------------------
// Waitlist
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn waitlist_insert_and_search(pool: PgPool) {
    let ada = WaitlistRepo::insert(&pool, &signup("Ada", "ada@x.com")).await.unwrap();
    WaitlistRepo::insert(&pool, &signup("Bayo", "bayo@y.com")).await.unwrap();

    assert_eq!(ada.name, "Ada");
    assert_eq!(ada.whatsapp, "08010000000");

    let all = WaitlistRepo::list_all(&pool).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].id, ada.id);

    let hits = WaitlistRepo::search(&pool, "ADA@").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].email, "ada@x.com");
}

// ---------------------------------------------------------------------------
// Missing schema
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn dropped_table_reports_schema_missing(pool: PgPool) {
    sqlx::query("DROP TABLE waitlist").execute(&pool).await.unwrap();

    let err = WaitlistRepo::list_all(&pool).await.unwrap_err();
    let classified = QueryError::from_sqlx(&err);
    assert!(classified.is_schema_missing(), "got {classified:?}");
}
