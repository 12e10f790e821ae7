use std::time::Duration;

use thiserror::Error;

pub const CREATION_FAILED_MESSAGE: &str = "coupon creation failed";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FieldNameError {
    #[error("unknown coupon field `{0}`")]
    UnknownField(String),
    #[error("`{0}` is not a text field")]
    UnknownTextField(String),
    #[error("`{0}` is not a date field")]
    UnknownDateField(String),
}

/// Temporal ordering violations, checked in declaration order.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DateViolation {
    #[error("issue start time must not be in the past")]
    StartInPast,
    #[error("issue end time must not be before the issue start time")]
    EndBeforeStart,
    #[error("expiration time must not be before the issue end time")]
    ExpirationBeforeEnd,
}

/// Local gate failures; the draft stays as it was.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("please fill in all fields")]
    MissingFields,
    #[error("discount rate must be greater than 0")]
    DiscountRateNotPositive,
    #[error("coupon quantity must be greater than 0")]
    TotalQuantityNotPositive,
    #[error("max discount is too large")]
    MaxDiscountOutOfRange,
    #[error(transparent)]
    Dates(#[from] DateViolation),
}

/// Failure reported by the submission capability.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("coupon API rejected the request (status {status:?})")]
    Rejected { status: Option<u16>, message: Option<String> },
    #[error("coupon API request failed: {0}")]
    Transport(String),
    #[error("coupon API did not respond within {0:?}")]
    TimedOut(Duration),
}

impl SubmitError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected { status: None, message: Some(message.into()) }
    }

    /// Human-readable message supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message: Some(message), .. } if !message.is_empty() => {
                Some(message.as_str())
            }
            _ => None,
        }
    }

    pub fn user_message(&self) -> &str {
        self.server_message().unwrap_or(CREATION_FAILED_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::errors::{DateViolation, SubmitError, ValidationError, CREATION_FAILED_MESSAGE};

    #[test]
    fn server_message_is_surfaced_verbatim() {
        let error = SubmitError::rejected("duplicate name");
        assert_eq!(error.server_message(), Some("duplicate name"));
        assert_eq!(error.user_message(), "duplicate name");
    }

    #[test]
    fn whitespace_server_message_is_still_reported_verbatim() {
        let error = SubmitError::Rejected { status: Some(400), message: Some("   ".to_string()) };
        assert_eq!(error.server_message(), Some("   "));
        assert_eq!(error.user_message(), "   ");
    }

    #[test]
    fn missing_or_empty_server_message_falls_back_to_generic_text() {
        let silent = SubmitError::Rejected { status: Some(500), message: None };
        let empty = SubmitError::Rejected { status: Some(400), message: Some(String::new()) };
        let transport = SubmitError::Transport("connection refused".to_string());

        assert_eq!(silent.user_message(), CREATION_FAILED_MESSAGE);
        assert_eq!(empty.user_message(), CREATION_FAILED_MESSAGE);
        assert_eq!(transport.user_message(), CREATION_FAILED_MESSAGE);
        assert_eq!(
            SubmitError::TimedOut(Duration::from_secs(30)).user_message(),
            CREATION_FAILED_MESSAGE
        );
    }

    #[test]
    fn date_violation_keeps_its_own_message_inside_validation_error() {
        let error = ValidationError::from(DateViolation::EndBeforeStart);
        assert_eq!(error.to_string(), DateViolation::EndBeforeStart.to_string());
        assert_ne!(error.to_string(), ValidationError::MissingFields.to_string());
    }
}
