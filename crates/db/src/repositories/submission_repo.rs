//! Repository for the `submissions` table.

use flash_core::form::FormData;
use flash_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use super::contains_pattern;
use crate::models::submission::Submission;

/// Column list for `submissions` queries.
const COLUMNS: &str = "id, created_at, data";

/// Newest first; the id breaks ties between rows written in one transaction.
const ORDER: &str = "ORDER BY created_at DESC, id DESC";

/// Provides data access for survey submissions.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Insert a completed answer set. The database assigns id and timestamp.
    pub async fn insert(pool: &PgPool, data: &FormData) -> Result<Submission, sqlx::Error> {
        let query = format!("INSERT INTO submissions (data) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Submission>(&query)
            .bind(Json(data))
            .fetch_one(pool)
            .await
    }

    /// Every submission, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM submissions {ORDER}");
        sqlx::query_as::<_, Submission>(&query).fetch_all(pool).await
    }

    /// Submissions whose answers contain `needle` (case-insensitive), newest first.
    pub async fn search(pool: &PgPool, needle: &str) -> Result<Vec<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM submissions WHERE data::text ILIKE $1 {ORDER}");
        sqlx::query_as::<_, Submission>(&query)
            .bind(contains_pattern(needle))
            .fetch_all(pool)
            .await
    }

    /// Find a submission by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM submissions WHERE id = $1");
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
