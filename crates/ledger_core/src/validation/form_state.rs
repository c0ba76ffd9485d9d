//! Per-form validation state for the project editor.
//!
//! # Responsibility
//! - Track the current error per field, touched fields, submit-flagged fields
//!   and summary banner visibility.
//! - Apply every change through the pure `FormValidationState::reduce`.
//!
//! # Invariants
//! - Summary is visible only when errors exist, a submit was attempted and
//!   the banner has not been dismissed since the last submit.
//! - A dismissed banner stays hidden until the next `trigger_form_validation`
//!   or `clear_all_validation`.
//! - A field shows its triangle only while it is flagged *and* errored.
//! - Single writer: callers sharing one state across threads must serialize
//!   access themselves; the last write per field wins.

use crate::model::client::ClientId;
use crate::validation::project_form::{
    extract_errors, validate_all_fields, validate_artist, validate_client, validate_date_range,
    validate_project_name, ProjectField, ProjectFormValues,
};
use crate::validation::result::ValidationResult;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

const INVALID_DATE_RANGE_INPUT: &str = "Invalid date range";

/// Raw value handed to `validate_field`.
///
/// A value whose shape does not match the field is validated as if the field
/// were empty; `EndDate` without a range fails with `Invalid date range`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Date(DateTime<Utc>),
    DateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Client(Option<ClientId>),
}

/// Discrete state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    FieldValidated {
        field: ProjectField,
        result: ValidationResult,
    },
    FieldFocused(ProjectField),
    FormValidated(BTreeMap<ProjectField, ValidationResult>),
    FieldCleared(ProjectField),
    AllCleared,
    SummaryHidden,
}

/// One banner row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryError {
    pub field_name: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValidationState {
    errors: BTreeMap<ProjectField, String>,
    focused: BTreeSet<ProjectField>,
    flagged: BTreeSet<ProjectField>,
    show_summary: bool,
    submit_attempted: bool,
    summary_dismissed: bool,
}

impl FormValidationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure transition function.
    pub fn reduce(mut self, action: FormAction) -> Self {
        match action {
            FormAction::FieldValidated { field, result } => {
                if result.is_valid {
                    self.errors.remove(&field);
                    self.flagged.remove(&field);
                } else {
                    let message = result
                        .error_message
                        .unwrap_or_else(|| format!("{} is invalid", field.display_name()));
                    self.errors.insert(field, message);
                }
            }
            FormAction::FieldFocused(field) => {
                self.focused.insert(field);
            }
            FormAction::FormValidated(results) => {
                self.submit_attempted = true;
                self.summary_dismissed = false;
                self.errors = extract_errors(&results);
                self.flagged = self.errors.keys().copied().collect();
            }
            FormAction::FieldCleared(field) => {
                self.errors.remove(&field);
                self.flagged.remove(&field);
            }
            FormAction::AllCleared => return Self::default(),
            FormAction::SummaryHidden => {
                self.summary_dismissed = true;
            }
        }

        self.show_summary =
            !self.errors.is_empty() && self.submit_attempted && !self.summary_dismissed;
        self
    }

    fn dispatch(&mut self, action: FormAction) {
        let current = std::mem::take(self);
        *self = current.reduce(action);
    }

    /// Runs the field's validator and records the outcome.
    pub fn validate_field(&mut self, field: ProjectField, value: FieldValue<'_>) -> bool {
        let result = field_result(field, value);
        let is_valid = result.is_valid;
        self.dispatch(FormAction::FieldValidated { field, result });
        is_valid
    }

    /// Submit-time validation of the whole form.
    ///
    /// Replaces the error map and flagged set atomically.
    pub fn trigger_form_validation(&mut self, values: &ProjectFormValues) -> bool {
        let results = validate_all_fields(values);
        let is_valid = results.values().all(|result| result.is_valid);
        self.dispatch(FormAction::FormValidated(results));
        is_valid
    }

    pub fn mark_field_as_focused(&mut self, field: ProjectField) {
        self.dispatch(FormAction::FieldFocused(field));
    }

    pub fn clear_validation(&mut self, field: ProjectField) {
        self.dispatch(FormAction::FieldCleared(field));
    }

    /// Resets the form to pristine, including submit-attempted.
    pub fn clear_all_validation(&mut self) {
        self.dispatch(FormAction::AllCleared);
    }

    /// Manual banner dismiss; errors are kept.
    pub fn hide_validation_summary(&mut self) {
        self.dispatch(FormAction::SummaryHidden);
    }

    pub fn should_show_triangle(&self, field: ProjectField) -> bool {
        self.flagged.contains(&field) && self.errors.contains_key(&field)
    }

    pub fn has_been_focused(&self, field: ProjectField) -> bool {
        self.focused.contains(&field)
    }

    pub fn validation_errors(&self) -> &BTreeMap<ProjectField, String> {
        &self.errors
    }

    pub fn error(&self, field: ProjectField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn focused_fields(&self) -> &BTreeSet<ProjectField> {
        &self.focused
    }

    pub fn flagged_fields(&self) -> &BTreeSet<ProjectField> {
        &self.flagged
    }

    pub fn should_show_validation_summary(&self) -> bool {
        self.show_summary
    }

    pub fn form_submission_attempted(&self) -> bool {
        self.submit_attempted
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_form_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Banner rows in field order. Start/end errors are reported as `Date Range`.
    pub fn summary_errors(&self) -> Vec<SummaryError> {
        self.errors
            .iter()
            .filter_map(|(field, message)| {
                let field_name = match field {
                    ProjectField::StartDate | ProjectField::EndDate => "Date Range",
                    ProjectField::Notes => return None,
                    other => other.display_name(),
                };
                Some(SummaryError {
                    field_name,
                    message: message.clone(),
                })
            })
            .collect()
    }
}

fn field_result(field: ProjectField, value: FieldValue<'_>) -> ValidationResult {
    match field {
        ProjectField::ProjectName => validate_project_name(text_or_empty(value)),
        ProjectField::Artist => validate_artist(text_or_empty(value)),
        ProjectField::StartDate | ProjectField::Notes => ValidationResult::valid(),
        ProjectField::EndDate => match value {
            FieldValue::DateRange { start, end } => validate_date_range(start, end),
            _ => ValidationResult::invalid(INVALID_DATE_RANGE_INPUT),
        },
        ProjectField::Client => match value {
            FieldValue::Client(client_id) => validate_client(client_id),
            // Any other non-absent value counts as a selection.
            _ => ValidationResult::valid(),
        },
    }
}

fn text_or_empty(value: FieldValue<'_>) -> &str {
    match value {
        FieldValue::Text(text) => text,
        _ => "",
    }
}
