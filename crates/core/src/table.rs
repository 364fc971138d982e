//! Names of the persisted record tables.
//!
//! The admin surface, the change notifications and the CSV export all
//! address tables by this enum rather than by free-form strings.

use serde::{Deserialize, Serialize};

/// A table the admin dashboard can read and subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Submissions,
    Waitlist,
}

impl Table {
    /// Every table, in the order the dashboard lists them.
    pub const ALL: [Table; 2] = [Table::Waitlist, Table::Submissions];

    /// The SQL table name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submissions => "submissions",
            Self::Waitlist => "waitlist",
        }
    }

    /// Prefix used for exported CSV file names.
    pub fn export_prefix(&self) -> &'static str {
        match self {
            Self::Submissions => "flash_survey",
            Self::Waitlist => "flash_waitlist",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
