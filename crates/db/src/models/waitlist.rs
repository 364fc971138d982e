//! Waitlist entry model and DTO.

use flash_core::export::WaitlistRow;
use flash_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Shortest and longest accepted WhatsApp numbers, counted in digits.
const WHATSAPP_MIN_DIGITS: usize = 7;
const WHATSAPP_MAX_DIGITS: usize = 15;

/// A row from the `waitlist` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WaitlistEntry {
    pub id: DbId,
    pub created_at: Timestamp,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
}

impl WaitlistEntry {
    /// Borrowed view used by the CSV exporter.
    pub fn as_export_row(&self) -> WaitlistRow<'_> {
        WaitlistRow {
            id: self.id,
            joined_at: self.created_at,
            name: &self.name,
            email: &self.email,
            whatsapp: &self.whatsapp,
        }
    }
}

/// DTO for joining the waitlist. All three fields are required.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWaitlistEntry {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(custom(function = "whatsapp_number"))]
    pub whatsapp: String,
}

impl CreateWaitlistEntry {
    /// Trim surrounding whitespace from every field.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            whatsapp: self.whatsapp.trim().to_string(),
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message("must not be empty".into()));
    }
    Ok(())
}

/// Digits with optional leading `+`; spaces and dashes are allowed between
/// digit groups.
fn whatsapp_number(value: &str) -> Result<(), ValidationError> {
    let rest = value.strip_prefix('+').unwrap_or(value);
    let invalid = || {
        ValidationError::new("whatsapp")
            .with_message("must be a phone number of 7 to 15 digits".into())
    };

    if !rest.chars().all(|c| c.is_ascii_digit() || c == ' ' || c == '-') {
        return Err(invalid());
    }
    let digits = rest.chars().filter(char::is_ascii_digit).count();
    if !(WHATSAPP_MIN_DIGITS..=WHATSAPP_MAX_DIGITS).contains(&digits) {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, email: &str, whatsapp: &str) -> CreateWaitlistEntry {
        CreateWaitlistEntry {
            name: name.into(),
            email: email.into(),
            whatsapp: whatsapp.into(),
        }
    }

    #[test]
    fn accepts_a_typical_signup() {
        entry("Ada", "ada@x.com", "08010000000").validate().unwrap();
        entry("Ada", "ada@x.com", "+234 801-000-0000").validate().unwrap();
    }

    #[test]
    fn rejects_blank_name() {
        let errors = entry("   ", "ada@x.com", "08010000000").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn rejects_bad_email_and_number() {
        let errors = entry("Ada", "not-an-email", "0801abc").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("whatsapp"));
    }

    #[test]
    fn rejects_numbers_outside_digit_range() {
        assert!(whatsapp_number("12345").is_err());
        assert!(whatsapp_number("1234567890123456").is_err());
        assert!(whatsapp_number("1234567").is_ok());
    }

    #[test]
    fn normalized_trims_fields() {
        let e = entry("  Ada ", " ada@x.com", "08010000000 ").normalized();
        assert_eq!(e.name, "Ada");
        assert_eq!(e.email, "ada@x.com");
        assert_eq!(e.whatsapp, "08010000000");
    }
}
