//! Structured query failures.
//!
//! Read paths hand these to callers as values so the admin surface can
//! recognize a missing schema and show the setup script instead of failing.

use serde::Serialize;

/// Error code for a missing table or column.
pub const SCHEMA_MISSING: &str = "SCHEMA_MISSING";

/// PostgreSQL SQLSTATEs that mean the schema has not been created.
const UNDEFINED_TABLE: &str = "42P01";
const UNDEFINED_COLUMN: &str = "42703";

/// A failed query reduced to a stable code and a printable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct QueryError {
    pub code: String,
    pub message: String,
}

impl QueryError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_schema_missing(&self) -> bool {
        self.code == SCHEMA_MISSING
    }

    /// Classify a sqlx error.
    ///
    /// Undefined table/column errors become [`SCHEMA_MISSING`]; other
    /// database errors keep their SQLSTATE; everything else is `QUERY_FAILED`.
    pub fn from_sqlx(err: &sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some(UNDEFINED_TABLE) | Some(UNDEFINED_COLUMN) => {
                    Self::new(SCHEMA_MISSING, db_err.message())
                }
                Some(code) => Self::new(code, db_err.message()),
                None => Self::new("QUERY_FAILED", db_err.message()),
            },
            other => Self::new("QUERY_FAILED", other.to_string()),
        }
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(err: sqlx::Error) -> Self {
        Self::from_sqlx(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_query_failed() {
        let err = QueryError::from_sqlx(&sqlx::Error::PoolTimedOut);
        assert_eq!(err.code, "QUERY_FAILED");
        assert!(!err.is_schema_missing());
    }

    #[test]
    fn displays_code_and_message() {
        let err = QueryError::new(SCHEMA_MISSING, "relation \"waitlist\" does not exist");
        assert!(err.is_schema_missing());
        assert_eq!(
            err.to_string(),
            "SCHEMA_MISSING: relation \"waitlist\" does not exist"
        );
    }
}
