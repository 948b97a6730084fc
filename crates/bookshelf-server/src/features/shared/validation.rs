//! Shared validation utilities
//!
//! Pure predicates over raw input fields, consumed by command `validate()`
//! methods. Each check returns a typed error whose `Display` is the
//! user-facing message.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use uuid::Uuid;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email regex compiles")
});

/// Titles accepted on a user profile
pub const VALID_TITLES: &[&str] = &["Mr", "Mrs", "Miss"];

/// Password length bounds, inclusive
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 15;

/// Errors that can occur during email validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmailValidationError {
    #[error("Email is required")]
    Required,

    #[error("Invalid email address")]
    InvalidFormat,
}

/// Errors that can occur during password validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordValidationError {
    #[error("Password is required")]
    Required,

    #[error("Password length should be 8 - 15 characters")]
    Length,
}

/// Errors that can occur during phone validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PhoneValidationError {
    #[error("phone is required")]
    Required,

    #[error("Invalid phone number")]
    InvalidFormat,
}

/// Errors that can occur during title validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TitleValidationError {
    #[error("Title is required")]
    Required,

    #[error("Title should be among Mr, Mrs, Miss")]
    Unknown,
}

/// Errors that can occur during rating validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RatingValidationError {
    #[error("rating is required")]
    Required,

    #[error("rating should be in a range 1-5")]
    OutOfRange,
}

/// Error for malformed record ids in paths and filters
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{value} is not a valid {label} id")]
pub struct IdValidationError {
    pub value: String,
    pub label: &'static str,
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), EmailValidationError> {
    if email.trim().is_empty() {
        return Err(EmailValidationError::Required);
    }
    if !EMAIL_RE.is_match(email.trim()) {
        return Err(EmailValidationError::InvalidFormat);
    }
    Ok(())
}

/// Validate a password: present, 8-15 characters
pub fn validate_password(password: &str) -> Result<(), PasswordValidationError> {
    if password.trim().is_empty() {
        return Err(PasswordValidationError::Required);
    }
    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(PasswordValidationError::Length);
    }
    Ok(())
}

/// Validate a phone number: digits only, 7-15 characters
pub fn validate_phone(phone: &str) -> Result<(), PhoneValidationError> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(PhoneValidationError::Required);
    }
    if phone.len() < 7 || phone.len() > 15 || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(PhoneValidationError::InvalidFormat);
    }
    Ok(())
}

/// Validate a user title against the accepted set
pub fn validate_title(title: &str) -> Result<(), TitleValidationError> {
    if title.trim().is_empty() {
        return Err(TitleValidationError::Required);
    }
    if !VALID_TITLES.contains(&title) {
        return Err(TitleValidationError::Unknown);
    }
    Ok(())
}

/// Validate a review rating: integer in [1, 5]
pub fn validate_rating(rating: i32) -> Result<(), RatingValidationError> {
    if !(1..=5).contains(&rating) {
        return Err(RatingValidationError::OutOfRange);
    }
    Ok(())
}

/// Parse a record id from a path or filter parameter
pub fn parse_id(value: &str, label: &'static str) -> Result<Uuid, IdValidationError> {
    Uuid::parse_str(value).map_err(|_| IdValidationError {
        value: value.to_string(),
        label,
    })
}

/// Non-empty check for free-text required fields
#[inline]
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Email validation tests
    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("reader@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.co").is_ok());
    }

    #[test]
    fn test_validate_email_empty() {
        assert_eq!(validate_email(""), Err(EmailValidationError::Required));
        assert_eq!(validate_email("   "), Err(EmailValidationError::Required));
    }

    #[test]
    fn test_validate_email_invalid() {
        assert_eq!(
            validate_email("not-an-email"),
            Err(EmailValidationError::InvalidFormat)
        );
        assert_eq!(
            validate_email("missing@tld"),
            Err(EmailValidationError::InvalidFormat)
        );
        assert_eq!(
            validate_email("spaces in@example.com"),
            Err(EmailValidationError::InvalidFormat)
        );
    }

    // Password validation tests
    #[test]
    fn test_validate_password_bounds() {
        assert!(validate_password("12345678").is_ok()); // 8 chars
        assert!(validate_password("123456789012345").is_ok()); // 15 chars
        assert_eq!(
            validate_password("1234567"),
            Err(PasswordValidationError::Length)
        );
        assert_eq!(
            validate_password("1234567890123456"),
            Err(PasswordValidationError::Length)
        );
    }

    #[test]
    fn test_validate_password_empty() {
        assert_eq!(validate_password(""), Err(PasswordValidationError::Required));
    }

    // Phone validation tests
    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("9876543210").is_ok());
        assert_eq!(validate_phone(""), Err(PhoneValidationError::Required));
        assert_eq!(
            validate_phone("98-76-54"),
            Err(PhoneValidationError::InvalidFormat)
        );
        assert_eq!(
            validate_phone("123"),
            Err(PhoneValidationError::InvalidFormat)
        );
    }

    // Title validation tests
    #[test]
    fn test_validate_title() {
        for title in VALID_TITLES {
            assert!(validate_title(title).is_ok());
        }
        assert_eq!(validate_title(""), Err(TitleValidationError::Required));
        assert_eq!(validate_title("Dr"), Err(TitleValidationError::Unknown));
        assert_eq!(validate_title("mr"), Err(TitleValidationError::Unknown));
    }

    // Rating validation tests
    #[test]
    fn test_validate_rating_boundaries() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert_eq!(validate_rating(0), Err(RatingValidationError::OutOfRange));
        assert_eq!(validate_rating(6), Err(RatingValidationError::OutOfRange));
        assert_eq!(validate_rating(-1), Err(RatingValidationError::OutOfRange));
    }

    // Id parsing tests
    #[test]
    fn test_parse_id() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "book").unwrap(), id);

        let err = parse_id("abc123", "book").unwrap_err();
        assert_eq!(err.to_string(), "abc123 is not a valid book id");
    }

    #[test]
    fn test_is_present() {
        assert!(is_present("x"));
        assert!(!is_present(""));
        assert!(!is_present("  "));
    }
}
