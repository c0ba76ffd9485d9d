//! Field-scoped validators for the project form.
//!
//! # Invariants
//! - Artist is optional here; only whitespace-only or over-long values fail.
//! - Name and artist are capped at `MAX_NAME_CHARS` characters after trimming.
//! - The date range is checked on `EndDate`; `StartDate` always passes.

use crate::model::client::ClientId;
use crate::validation::result::ValidationResult;
use crate::validation::rules::{
    is_not_empty, is_reasonable_date_range, is_valid_date_range,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MAX_NAME_CHARS: usize = 100;

/// Logical field ids of the project form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectField {
    ProjectName,
    Artist,
    StartDate,
    EndDate,
    Client,
    Notes,
}

impl ProjectField {
    pub const ALL: [ProjectField; 6] = [
        ProjectField::ProjectName,
        ProjectField::Artist,
        ProjectField::StartDate,
        ProjectField::EndDate,
        ProjectField::Client,
        ProjectField::Notes,
    ];

    /// Human-readable field name for error messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::ProjectName => "Project Name",
            Self::Artist => "Artist",
            Self::StartDate => "Start Date",
            Self::EndDate => "End Date",
            Self::Client => "Client",
            Self::Notes => "Notes",
        }
    }
}

/// Snapshot of everything the project form validates on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFormValues {
    pub project_name: String,
    pub artist: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub client_id: Option<ClientId>,
}

pub fn validate_project_name(name: &str) -> ValidationResult {
    if !is_not_empty(name) {
        return ValidationResult::invalid("Project name is required");
    }
    if name.trim().chars().count() > MAX_NAME_CHARS {
        return ValidationResult::invalid("Project name cannot exceed 100 characters");
    }
    ValidationResult::valid()
}

pub fn validate_artist(artist: &str) -> ValidationResult {
    if artist.is_empty() {
        return ValidationResult::valid();
    }

    let trimmed = artist.trim();
    if trimmed.is_empty() {
        return ValidationResult::invalid("Artist name cannot be just whitespace");
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        return ValidationResult::invalid("Artist name cannot exceed 100 characters");
    }
    ValidationResult::valid()
}

pub fn validate_date_range(start: DateTime<Utc>, end: DateTime<Utc>) -> ValidationResult {
    if !is_valid_date_range(start, end) {
        return ValidationResult::invalid("End date must be after start date");
    }
    if !is_reasonable_date_range(start, end) {
        return ValidationResult::invalid("Project duration cannot exceed 2 years");
    }
    ValidationResult::valid()
}

/// A project must reference a client before it can be saved from the form.
pub fn validate_client(client_id: Option<ClientId>) -> ValidationResult {
    match client_id {
        Some(_) => ValidationResult::valid(),
        None => ValidationResult::invalid("Client selection is required"),
    }
}

/// Runs every form validator. `Notes` has no rules and is not reported.
pub fn validate_all_fields(values: &ProjectFormValues) -> BTreeMap<ProjectField, ValidationResult> {
    BTreeMap::from([
        (
            ProjectField::ProjectName,
            validate_project_name(&values.project_name),
        ),
        (ProjectField::Artist, validate_artist(&values.artist)),
        (ProjectField::StartDate, ValidationResult::valid()),
        (
            ProjectField::EndDate,
            validate_date_range(values.start_date, values.end_date),
        ),
        (ProjectField::Client, validate_client(values.client_id)),
    ])
}

pub fn is_form_valid(results: &BTreeMap<ProjectField, ValidationResult>) -> bool {
    results.values().all(|result| result.is_valid)
}

/// Keeps only failed fields, mapped to their messages.
pub fn extract_errors(
    results: &BTreeMap<ProjectField, ValidationResult>,
) -> BTreeMap<ProjectField, String> {
    results
        .iter()
        .filter_map(|(field, result)| result.error().map(|message| (*field, message.to_string())))
        .collect()
}

/// Failure messages in field display order.
pub fn error_summary(results: &BTreeMap<ProjectField, ValidationResult>) -> Vec<String> {
    results
        .values()
        .filter_map(|result| result.error().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn values() -> ProjectFormValues {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        ProjectFormValues {
            project_name: "Session A".to_string(),
            artist: String::new(),
            start_date: start,
            end_date: start + Duration::hours(3),
            client_id: Some(Uuid::new_v4()),
        }
    }

    #[test]
    fn project_name_rules() {
        assert!(validate_project_name("Album tracking").is_valid);
        assert_eq!(
            validate_project_name("   ").error(),
            Some("Project name is required")
        );
        assert_eq!(
            validate_project_name(&"x".repeat(101)).error(),
            Some("Project name cannot exceed 100 characters")
        );
        assert!(validate_project_name(&format!("  {}  ", "x".repeat(100))).is_valid);
    }

    #[test]
    fn artist_is_optional_but_not_blank() {
        assert!(validate_artist("").is_valid);
        assert!(validate_artist("The Band").is_valid);
        assert_eq!(
            validate_artist("  ").error(),
            Some("Artist name cannot be just whitespace")
        );
        assert_eq!(
            validate_artist(&"a".repeat(101)).error(),
            Some("Artist name cannot exceed 100 characters")
        );
    }

    #[test]
    fn date_range_messages() {
        let now = Utc::now();
        assert_eq!(
            validate_date_range(now, now).error(),
            Some("End date must be after start date")
        );
        assert!(validate_date_range(now, now + Duration::hours(1)).is_valid);
        assert_eq!(
            validate_date_range(now, now + Duration::days(365 * 3)).error(),
            Some("Project duration cannot exceed 2 years")
        );
    }

    #[test]
    fn client_selection_required() {
        assert!(validate_client(Some(Uuid::new_v4())).is_valid);
        assert_eq!(
            validate_client(None).error(),
            Some("Client selection is required")
        );
    }

    #[test]
    fn all_fields_report_in_display_order() {
        let mut input = values();
        input.project_name = String::new();
        input.client_id = None;

        let results = validate_all_fields(&input);
        assert!(!is_form_valid(&results));
        assert!(!results.contains_key(&ProjectField::Notes));
        assert_eq!(
            error_summary(&results),
            vec![
                "Project name is required".to_string(),
                "Client selection is required".to_string(),
            ]
        );
        let errors = extract_errors(&results);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key(&ProjectField::ProjectName));
    }

    #[test]
    fn valid_form_has_no_errors() {
        let results = validate_all_fields(&values());
        assert!(is_form_valid(&results));
        assert!(extract_errors(&results).is_empty());
    }
}
