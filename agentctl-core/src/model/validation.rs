//! Field validation for inbound records.

use std::fmt;

/// Validation failure for a single field.
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Required field is empty.
    Empty { field: &'static str },

    /// Field exceeds its column's maximum length.
    TooLong { field: &'static str, max: usize },

    /// Value is outside a closed enum's permitted set.
    InvalidVariant { field: &'static str, value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Non-empty, length-bounded required field.
pub(crate) fn require(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    bound(field, value, max)
}

/// Length bound only; empty is allowed.
pub(crate) fn bound(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Length bound on an optional field.
pub(crate) fn bound_opt(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(v) => bound(field, v, max),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_required_field() {
        let err = require("name", "   ", 255).unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "name" }));
    }

    #[test]
    fn over_limit() {
        let long = "x".repeat(300);
        let err = require("name", &long, 255).unwrap_err();
        assert_eq!(
            err.to_string(),
            "name exceeds maximum length of 255 characters"
        );
    }

    #[test]
    fn optional_none_passes() {
        assert!(bound_opt("description", None, 500).is_ok());
    }
}
