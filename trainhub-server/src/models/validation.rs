//! Validation error types

use std::fmt;

/// Validation error for domain models
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length (in characters)
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Request body could not be decoded
    MalformedBody { message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::MalformedBody { message } => write!(f, "malformed request body: {}", message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Reject `s` if it is longer than `max` characters.
///
/// Counts characters, not bytes, to line up with `VARCHAR(n)` columns.
pub(crate) fn check_len(field: &'static str, s: &str, max: usize) -> Result<(), ValidationError> {
    if s.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Reject `s` if it contains a NUL character.
///
/// PostgreSQL text columns cannot hold `\0`.
pub(crate) fn check_no_nul(field: &'static str, s: &str) -> Result<(), ValidationError> {
    if s.contains('\0') {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must not contain NUL characters",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "name",
            max: 100,
        };
        assert_eq!(
            err.to_string(),
            "name exceeds maximum length of 100 characters"
        );
    }

    #[test]
    fn length_counts_chars() {
        // 4 chars, 8 bytes
        assert!(check_len("tag", "żółć", 4).is_ok());
        assert!(check_len("tag", "żółća", 4).is_err());
    }

    #[test]
    fn nul_is_rejected() {
        assert!(check_no_nul("name", "Squat").is_ok());
        let err = check_no_nul("name", "Sq\0uat").unwrap_err();
        assert_eq!(err.to_string(), "name: must not contain NUL characters");
    }
}
