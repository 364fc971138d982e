//! Repository structs providing database access for each table.

mod submission_repo;
mod waitlist_repo;

pub use submission_repo::SubmissionRepo;
pub use waitlist_repo::WaitlistRepo;

/// Build an `ILIKE` pattern matching `needle` anywhere, with the pattern
/// metacharacters in `needle` escaped.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(contains_pattern("lagos"), "%lagos%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
