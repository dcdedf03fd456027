//! Display name validation

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

pub const MAX_DISPLAY_NAME_CHARS: usize = 32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("Name required")]
    Empty,
    #[error("Name must be 1-{MAX_DISPLAY_NAME_CHARS} characters")]
    Length,
    #[error("Contains invalid characters")]
    InvalidCharacters,
}

fn allowed_chars() -> &'static Regex {
    static ALLOWED: OnceLock<Regex> = OnceLock::new();
    // letters, numbers, punctuation, separators
    ALLOWED.get_or_init(|| Regex::new(r"^[\p{L}\p{N}\p{P}\p{Z}]+$").expect("static pattern"))
}

/// Check a totem display name before it is sent to the ledger
pub fn validate_display_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.chars().count() > MAX_DISPLAY_NAME_CHARS {
        return Err(NameError::Length);
    }
    if !allowed_chars().is_match(name) {
        return Err(NameError::InvalidCharacters);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_display_name("Hoot").is_ok());
        assert!(validate_display_name("Sir Otter, III.").is_ok());
        assert!(validate_display_name("Zorro 42").is_ok());
        assert!(validate_display_name("Лиса").is_ok());
        assert!(validate_display_name(&"a".repeat(32)).is_ok());
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(validate_display_name(""), Err(NameError::Empty));
        assert_eq!(validate_display_name(&"a".repeat(33)), Err(NameError::Length));
        assert_eq!(validate_display_name("tab\there"), Err(NameError::InvalidCharacters));
        assert_eq!(validate_display_name("a+b"), Err(NameError::InvalidCharacters));
        assert_eq!(validate_display_name("🦉"), Err(NameError::InvalidCharacters));
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        assert!(validate_display_name(&"é".repeat(32)).is_ok());
    }
}
