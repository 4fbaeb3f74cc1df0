//! Validation error types

use std::fmt;

/// Validation error for domain models
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Field doesn't match the required format
    InvalidFormat { field: &'static str, reason: &'static str },
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
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim and check a required string field.
pub(crate) fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "title",
            max: 255,
        };
        assert_eq!(
            err.to_string(),
            "title exceeds maximum length of 255 characters"
        );
    }

    #[test]
    fn required_trims() {
        assert_eq!(required("  hello  ", "title").unwrap(), "hello");
    }

    #[test]
    fn required_rejects_whitespace_only() {
        assert!(matches!(
            required("   ", "title").unwrap_err(),
            ValidationError::Empty { field: "title" }
        ));
    }
}
