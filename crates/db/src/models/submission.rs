//! Survey submission model and DTO.

use flash_core::export::SubmissionRow;
use flash_core::form::FormData;
use flash_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `submissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: DbId,
    pub created_at: Timestamp,
    pub data: Json<FormData>,
}

impl Submission {
    pub fn answers(&self) -> &FormData {
        &self.data.0
    }

    /// Borrowed view used by the CSV exporter.
    pub fn as_export_row(&self) -> SubmissionRow<'_> {
        SubmissionRow {
            id: self.id,
            submitted_at: self.created_at,
            answers: self.answers(),
        }
    }
}

/// DTO for submitting a completed survey.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubmission {
    pub data: FormData,
}
