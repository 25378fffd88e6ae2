//! Field checks run before any record is created or edited.

use crate::model::UserDraft;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+\-() ]{7,15}$").expect("phone pattern compiles"));

/// The first field of a draft that failed its check.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid name")]
    Name,
    #[error("Invalid email")]
    Email,
    #[error("Invalid phone")]
    Phone,
}

impl ValidationError {
    /// Name of the offending form field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Name => "fullName",
            ValidationError::Email => "email",
            ValidationError::Phone => "phone",
        }
    }
}

/// At least two characters.
pub fn validate_name(name: &str) -> bool {
    name.chars().count() >= 2
}

/// `local@domain.tld`, no whitespace, a single `@`.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// 7 to 15 characters drawn from digits, `+`, `-`, `(`, `)` and spaces.
pub fn validate_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Checks name, email and phone in that order and stops at the first failure.
pub fn validate_user(draft: &UserDraft) -> Result<(), ValidationError> {
    if !validate_name(&draft.full_name) {
        return Err(ValidationError::Name);
    }
    if !validate_email(&draft.email) {
        return Err(ValidationError::Email);
    }
    if !validate_phone(&draft.phone) {
        return Err(ValidationError::Phone);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_needs_two_characters() {
        assert!(!validate_name(""));
        assert!(!validate_name("J"));
        assert!(!validate_name("É"));
        assert!(validate_name("Jo"));
        assert!(validate_name("Ñu"));
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("a@b.com"));
        assert!(validate_email("first.last@mail.example.org"));

        for bad in [
            "",
            "bad-email",
            "a@b",
            "a@@b.com",
            "a@b@c.com",
            "@b.com",
            "a@.com",
            "a@b.",
            "a b@c.com",
            "a@b .com",
        ] {
            assert!(!validate_email(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_phone_charset_and_length() {
        assert!(validate_phone("+1 555-1234"));
        assert!(validate_phone("(555) 123-4567"));
        assert!(validate_phone("1234567"));
        assert!(validate_phone("123456789012345"));

        assert!(!validate_phone("123456"));
        assert!(!validate_phone("1234567890123456"));
        assert!(!validate_phone("555.123.4567"));
        assert!(!validate_phone("555-CALL-NOW"));
        assert!(!validate_phone("555\t1234567"));
    }

    #[test]
    fn test_validate_user_short_circuits_in_field_order() {
        let ok = UserDraft::new("Jo", "jo@example.com", "+1 555-1234");
        assert_eq!(validate_user(&ok), Ok(()));

        let all_bad = UserDraft::new("J", "nope", "x");
        assert_eq!(validate_user(&all_bad), Err(ValidationError::Name));

        let bad_email = UserDraft::new("Jo", "bad-email", "x");
        assert_eq!(validate_user(&bad_email), Err(ValidationError::Email));
        assert_eq!(ValidationError::Email.field(), "email");

        let bad_phone = UserDraft::new("Jo", "jo@example.com", "12");
        assert_eq!(validate_user(&bad_phone), Err(ValidationError::Phone));
    }
}
