//! Universal outcome type for field validators.

use serde::{Deserialize, Serialize};

/// Pass/fail outcome with an optional user-facing reason.
///
/// `error_message` is `Some` exactly when `is_valid` is `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error_message: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error_message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error_message: Some(message.into()),
        }
    }

    /// Returns the failure reason, if any.
    pub fn error(&self) -> Option<&str> {
        if self.is_valid {
            None
        } else {
            self.error_message.as_deref()
        }
    }
}
