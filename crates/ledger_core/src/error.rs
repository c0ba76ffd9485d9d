//! Ledger error taxonomy.
//!
//! # Responsibility
//! - Define the single user-facing error type surfaced by validators and services.
//! - Provide display text and a recovery hint for every variant.
//!
//! # Invariants
//! - Every variant is recoverable; nothing in core maps to a process crash.
//! - Field-level rules return `ValidationResult`; only entity-level
//!   `validate()` and the save boundary produce `LedgerError`.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result alias for ledger use-cases.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Error raised at save/export boundaries and by entity validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Persistence write or read failed underneath the service.
    DataCorruption,
    InvalidDateConfiguration,
    /// Referenced file (invoice PDF, backup) does not exist.
    FileNotFound,
    InvalidProjectData,
    CalculationError,
    ValidationFailed(String),
    UnexpectedNilValue(String),
    /// End instant is not strictly after the start instant.
    InvalidDateRange,
    /// Named required field is blank after trimming.
    EmptyRequiredField(String),
    InvalidEmailFormat,
    InvalidPhoneFormat,
    /// Settings payload could not be decoded.
    InvalidConfiguration(String),
}

impl LedgerError {
    /// Returns a short hint the UI can show under the error message.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::DataCorruption => "Try refreshing the data or restarting the app.",
            Self::InvalidDateConfiguration => "Check your system date settings and try again.",
            Self::FileNotFound => "Verify the file exists and try again.",
            Self::InvalidProjectData => "Check all required project fields are filled in.",
            Self::CalculationError => "Verify all numerical values are valid.",
            Self::ValidationFailed(_) => "Please correct the highlighted fields and try again.",
            Self::UnexpectedNilValue(_) => "Please ensure all required data is provided.",
            Self::InvalidDateRange => {
                "Please adjust the dates so the end date is after the start date."
            }
            Self::EmptyRequiredField(_) => "Please fill in the required field.",
            Self::InvalidEmailFormat | Self::InvalidPhoneFormat => {
                "Please check the format and try again."
            }
            Self::InvalidConfiguration(_) => "Review your settings and save them again.",
        }
    }

    /// Stable machine-readable code used in log lines and FFI envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DataCorruption => "data_corruption",
            Self::InvalidDateConfiguration => "invalid_date_configuration",
            Self::FileNotFound => "file_not_found",
            Self::InvalidProjectData => "invalid_project_data",
            Self::CalculationError => "calculation_error",
            Self::ValidationFailed(_) => "validation_failed",
            Self::UnexpectedNilValue(_) => "unexpected_nil_value",
            Self::InvalidDateRange => "invalid_date_range",
            Self::EmptyRequiredField(_) => "empty_required_field",
            Self::InvalidEmailFormat => "invalid_email_format",
            Self::InvalidPhoneFormat => "invalid_phone_format",
            Self::InvalidConfiguration(_) => "invalid_configuration",
        }
    }
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataCorruption => write!(
                f,
                "Data appears to be corrupted. Please try again or contact support."
            ),
            Self::InvalidDateConfiguration => write!(
                f,
                "Unable to configure dates properly. Using current time instead."
            ),
            Self::FileNotFound => write!(f, "The requested file could not be found."),
            Self::InvalidProjectData => write!(f, "Project data is incomplete or invalid."),
            Self::CalculationError => write!(f, "An error occurred during calculation."),
            Self::ValidationFailed(message) => write!(f, "Validation failed: {message}"),
            Self::UnexpectedNilValue(context) => {
                write!(f, "Unexpected missing data in {context}.")
            }
            Self::InvalidDateRange => write!(f, "End date must be after start date."),
            Self::EmptyRequiredField(field) => {
                write!(f, "{field} is required and cannot be empty.")
            }
            Self::InvalidEmailFormat => write!(f, "Please enter a valid email address."),
            Self::InvalidPhoneFormat => write!(f, "Please enter a valid phone number."),
            Self::InvalidConfiguration(details) => write!(f, "Invalid settings: {details}"),
        }
    }
}

impl Error for LedgerError {}

#[cfg(test)]
mod tests {
    use super::LedgerError;

    #[test]
    fn empty_required_field_names_the_field() {
        let err = LedgerError::EmptyRequiredField("Name or Company".to_string());
        assert_eq!(
            err.to_string(),
            "Name or Company is required and cannot be empty."
        );
        assert_eq!(err.recovery_suggestion(), "Please fill in the required field.");
    }

    #[test]
    fn format_errors_share_recovery_hint() {
        assert_eq!(
            LedgerError::InvalidEmailFormat.recovery_suggestion(),
            LedgerError::InvalidPhoneFormat.recovery_suggestion()
        );
    }

    #[test]
    fn codes_are_snake_case() {
        assert_eq!(LedgerError::DataCorruption.code(), "data_corruption");
        assert_eq!(
            LedgerError::ValidationFailed("x".to_string()).code(),
            "validation_failed"
        );
    }
}
