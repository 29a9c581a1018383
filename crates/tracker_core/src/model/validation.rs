//! Payload validation shared by every entity.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

pub type ValidationResult<T> = Result<T, ValidationError>;

/// A creatable payload broke a field rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("`{field}` must not be blank")]
    BlankField { field: &'static str },
    #[error("`{field}` is not a valid email address")]
    InvalidEmail { field: &'static str },
    #[error("`{later}` must not be earlier than `{earlier}`")]
    DateOrder {
        earlier: &'static str,
        later: &'static str,
    },
    #[error("`{field}` must not be negative")]
    Negative { field: &'static str },
}

pub(crate) fn require_text(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField { field });
    }
    Ok(())
}

pub(crate) fn validate_email(field: &'static str, value: &str) -> ValidationResult<()> {
    if !EMAIL_RE.is_match(value.trim()) {
        return Err(ValidationError::InvalidEmail { field });
    }
    Ok(())
}

pub(crate) fn validate_date_order(
    earlier: (&'static str, Option<NaiveDate>),
    later: (&'static str, Option<NaiveDate>),
) -> ValidationResult<()> {
    if let (Some(start), Some(end)) = (earlier.1, later.1) {
        if end < start {
            return Err(ValidationError::DateOrder {
                earlier: earlier.0,
                later: later.0,
            });
        }
    }
    Ok(())
}
