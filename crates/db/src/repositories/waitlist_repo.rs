//! Repository for the `waitlist` table.

use sqlx::PgPool;

use super::contains_pattern;
use crate::models::waitlist::{CreateWaitlistEntry, WaitlistEntry};

/// Column list for `waitlist` queries.
const COLUMNS: &str = "id, created_at, name, email, whatsapp";

const ORDER: &str = "ORDER BY created_at DESC, id DESC";

/// Provides data access for waitlist signups.
pub struct WaitlistRepo;

impl WaitlistRepo {
    /// Insert a signup. The database assigns id and timestamp.
    pub async fn insert(
        pool: &PgPool,
        input: &CreateWaitlistEntry,
    ) -> Result<WaitlistEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO waitlist (name, email, whatsapp) VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WaitlistEntry>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.whatsapp)
            .fetch_one(pool)
            .await
    }

    /// Every signup, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<WaitlistEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM waitlist {ORDER}");
        sqlx::query_as::<_, WaitlistEntry>(&query).fetch_all(pool).await
    }

    /// Signups whose name, email or number contain `needle`
    /// (case-insensitive), newest first.
    pub async fn search(pool: &PgPool, needle: &str) -> Result<Vec<WaitlistEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM waitlist \
             WHERE (name || email || whatsapp) ILIKE $1 {ORDER}"
        );
        sqlx::query_as::<_, WaitlistEntry>(&query)
            .bind(contains_pattern(needle))
            .fetch_all(pool)
            .await
    }
}
