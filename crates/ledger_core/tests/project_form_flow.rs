use chrono::{Duration, TimeZone, Utc};
use ledger_core::db::open_db_in_memory;
use ledger_core::validation::project_form::validate_date_range;
use ledger_core::validation::{FieldValue, ProjectFormValues};
use ledger_core::{
    calculate_fee_total, Client, FormValidationState, Item, ItemType, LedgerConfig, LedgerService,
    Project, ProjectField, SqliteLedgerRepository,
};
use std::sync::{Arc, Mutex};
use std::thread;
use uuid::Uuid;

fn form_values(project: &Project) -> ProjectFormValues {
    ProjectFormValues {
        project_name: project.project_name.clone(),
        artist: project.artist.clone(),
        start_date: project.start_date,
        end_date: project.end_date,
        client_id: project.client_id,
    }
}

#[test]
fn editing_a_project_from_invalid_to_saved() {
    let conn = open_db_in_memory().unwrap();
    let config = LedgerConfig::default();
    let service = LedgerService::new(SqliteLedgerRepository::new(&conn), &config);

    let client = Client::person("Jane", "Doe");
    service.save_client(&client).unwrap();

    let start = Utc.with_ymd_and_hms(2025, 9, 1, 10, 0, 0).unwrap();
    let mut project = Project::with_id(Uuid::new_v4(), "", start, start + Duration::hours(1));
    project.artist = "The Band".to_string();
    project.client_id = Some(client.id);
    project.add_item(Item::new("Session", 150.0, ItemType::Session));
    project.add_item(Item::new("Overdub", 75.0, ItemType::Overdub));
    assert_eq!(calculate_fee_total(&project.items), 225.0);

    let mut form = FormValidationState::new();
    assert!(!form.trigger_form_validation(&form_values(&project)));
    assert_eq!(
        form.error(ProjectField::ProjectName),
        Some("Project name is required")
    );
    assert!(form.should_show_validation_summary());
    assert!(form.should_show_triangle(ProjectField::ProjectName));
    assert!(!form.should_show_triangle(ProjectField::Artist));
    assert!(service.save_project(&project).is_err());

    project.project_name = "Session A".to_string();
    assert!(form.validate_field(
        ProjectField::ProjectName,
        FieldValue::Text(&project.project_name)
    ));
    assert_eq!(form.error(ProjectField::ProjectName), None);
    assert!(!form.should_show_triangle(ProjectField::ProjectName));
    assert!(!form.should_show_validation_summary());

    assert!(form.trigger_form_validation(&form_values(&project)));
    service.save_project(&project).unwrap();
    assert_eq!(service.get_project(project.id).unwrap().fee_total(), 225.0);
}

#[test]
fn missing_client_blocks_the_form_but_not_the_entity() {
    let start = Utc.with_ymd_and_hms(2025, 9, 1, 10, 0, 0).unwrap();
    let mut project = Project::with_id(Uuid::new_v4(), "Demo", start, start + Duration::hours(2));
    project.artist = "Solo".to_string();

    let mut form = FormValidationState::new();
    assert!(!form.trigger_form_validation(&form_values(&project)));
    assert_eq!(
        form.error(ProjectField::Client),
        Some("Client selection is required")
    );

    let summary = form.summary_errors();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].message, "Client selection is required");
}

#[test]
fn dismissed_summary_stays_hidden_until_next_submit() {
    let start = Utc.with_ymd_and_hms(2025, 9, 1, 10, 0, 0).unwrap();
    let values = ProjectFormValues {
        project_name: String::new(),
        artist: String::new(),
        start_date: start,
        end_date: start + Duration::days(3 * 365),
        client_id: None,
    };

    let mut form = FormValidationState::new();
    form.trigger_form_validation(&values);
    assert!(form.should_show_validation_summary());

    form.hide_validation_summary();
    assert!(!form.should_show_validation_summary());
    assert!(form.has_errors());

    form.validate_field(ProjectField::Artist, FieldValue::Text("  "));
    assert!(!form.should_show_validation_summary());

    form.trigger_form_validation(&values);
    assert!(form.should_show_validation_summary());
    assert_eq!(
        form.error(ProjectField::EndDate),
        validate_date_range(values.start_date, values.end_date).error()
    );
}

#[test]
fn shared_form_state_is_last_write_wins_per_field() {
    let form = Arc::new(Mutex::new((FormValidationState::new(), Vec::new())));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let form = Arc::clone(&form);
            thread::spawn(move || {
                let name = if worker % 2 == 0 { "" } else { "Session" };
                let mut guard = form.lock().unwrap();
                let (state, writers) = &mut *guard;
                state.mark_field_as_focused(ProjectField::ProjectName);
                state.validate_field(ProjectField::ProjectName, FieldValue::Text(name));
                state.validate_field(ProjectField::Artist, FieldValue::Text("Artist"));
                writers.push(worker);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut guard = form.lock().unwrap();
    let (state, writers) = &mut *guard;
    assert_eq!(writers.len(), 8);
    let last_writer = *writers.last().unwrap();
    let expected = if last_writer % 2 == 0 {
        Some("Project name is required")
    } else {
        None
    };
    assert_eq!(state.error(ProjectField::ProjectName), expected);
    assert_eq!(state.has_errors(), expected.is_some());
    assert!(state.has_been_focused(ProjectField::ProjectName));
    assert_eq!(state.focused_fields().len(), 1);
    assert_eq!(state.error(ProjectField::Artist), None);

    state.validate_field(ProjectField::ProjectName, FieldValue::Text("Final"));
    assert!(!state.has_errors());
    assert!(!state.form_submission_attempted());
}
