//! Entity-level validators used at the save boundary.
//!
//! # Responsibility
//! - Short-circuit on the first broken invariant of a whole record.
//! - Report failures as `LedgerError` so services can veto a write.
//!
//! # Invariants
//! - Validation never mutates the record.
//! - Email/phone are optional: blank values always pass.

use crate::error::{LedgerError, LedgerResult};
use crate::model::{Client, Item, Project};
use crate::validation::project_form::validate_artist;
use crate::validation::rules::{
    is_not_empty, is_valid_date_range, is_valid_email, is_valid_fee, is_valid_phone_number,
};
use serde::{Deserialize, Serialize};

/// Record-level validation contract.
pub trait Validatable {
    fn validate(&self) -> LedgerResult<()>;
}

/// Save-time policy for project fields that differ between form and entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectRules {
    /// When `true`, a blank artist vetoes the save. When `false`, artist
    /// follows the form rule: empty passes, whitespace-only fails.
    pub artist_required: bool,
}

impl Default for ProjectRules {
    fn default() -> Self {
        Self {
            artist_required: true,
        }
    }
}

impl Validatable for Client {
    fn validate(&self) -> LedgerResult<()> {
        let has_name = is_not_empty(&self.first_name) || is_not_empty(&self.last_name);
        if !has_name && !is_not_empty(&self.company) {
            return Err(LedgerError::EmptyRequiredField("Name or Company".to_string()));
        }

        if is_not_empty(&self.email) && !is_valid_email(&self.email) {
            return Err(LedgerError::InvalidEmailFormat);
        }

        if is_not_empty(&self.phone) && !is_valid_phone_number(&self.phone) {
            return Err(LedgerError::InvalidPhoneFormat);
        }

        Ok(())
    }
}

impl Validatable for Project {
    /// Strict rules: name and artist required, end strictly after start.
    fn validate(&self) -> LedgerResult<()> {
        validate_project(self, &ProjectRules::default())
    }
}

impl Validatable for Item {
    fn validate(&self) -> LedgerResult<()> {
        if !is_valid_fee(self.fee) {
            return Err(LedgerError::ValidationFailed(
                "Fee must be zero or a positive amount".to_string(),
            ));
        }
        Ok(())
    }
}

/// Validates a project under the given rules.
///
/// Checks, in order: name, artist, date ordering.
pub fn validate_project(project: &Project, rules: &ProjectRules) -> LedgerResult<()> {
    if !is_not_empty(&project.project_name) {
        return Err(LedgerError::EmptyRequiredField("Project Name".to_string()));
    }

    if rules.artist_required {
        if !is_not_empty(&project.artist) {
            return Err(LedgerError::EmptyRequiredField("Artist".to_string()));
        }
    } else if let Some(message) = validate_artist(&project.artist).error() {
        return Err(LedgerError::ValidationFailed(message.to_string()));
    }

    if !is_valid_date_range(project.start_date, project.end_date) {
        return Err(LedgerError::InvalidDateRange);
    }

    Ok(())
}
