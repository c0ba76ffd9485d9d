use chrono::{DateTime, Duration, TimeZone, Utc};
use ledger_core::db::open_db_in_memory;
use ledger_core::service::{export_to_csv, export_to_json, load_json_backup, BackupService};
use ledger_core::{
    Client, Invoice, Item, ItemType, LedgerConfig, LedgerError, LedgerRepository, Project,
    SqliteLedgerRepository,
};
use serde_json::Value;
use uuid::Uuid;

fn backup_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap()
}

fn seed(repo: &SqliteLedgerRepository<'_>) {
    let mut client = Client::person("Jane", "Doe");
    client.email = "jane@example.com".to_string();
    client.address = "12 Main St, Apt 4".to_string();
    repo.save_client(&client).unwrap();

    let start = Utc.with_ymd_and_hms(2025, 6, 20, 10, 0, 0).unwrap();
    let mut project = Project::with_id(Uuid::new_v4(), "Score, Reel 2", start, start + Duration::hours(6));
    project.artist = "Composer".to_string();
    project.client_id = Some(client.id);
    project.add_item(Item::new("Orchestration", 1200.0, ItemType::Arrangement));
    project.add_item(Item::new("Copying", 300.25, ItemType::Score));
    project.invoice = Some(Invoice::new(1010, "Invoice_1010_Jane Doe_2025-06-30.pdf"));
    repo.save_project(&project).unwrap();
}

#[test]
fn json_export_is_sorted_pretty_and_loadable() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteLedgerRepository::new(&conn);
    seed(&repo);
    let mut config = LedgerConfig::default();
    config.app_version = "2.1.0".to_string();
    config.user_data.user_first_name = "Gabe".to_string();

    let service = BackupService::new(repo, &config);
    let backup = service.create_full_backup(backup_date()).unwrap();
    let path = export_to_json(&backup, dir.path()).unwrap();

    assert_eq!(path, dir.path().join("ledger_backup_2025-07-01.json"));
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains('\n'));

    let value: Value = serde_json::from_str(&raw).unwrap();
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["appVersion", "backupDate", "clients", "projects", "userData"]);
    assert_eq!(value["backupDate"], "2025-07-01T12:00:00Z");
    assert_eq!(value["appVersion"], "2.1.0");
    assert_eq!(value["projects"][0]["clientName"], "Jane Doe");
    assert_eq!(value["projects"][0]["invoiceNumber"], 1010);
    assert_eq!(value["projects"][0]["items"][1]["itemType"], "Score");
    assert_eq!(value["userData"]["userFirstName"], "Gabe");

    let raw_keys: Vec<usize> = ["\"appVersion\"", "\"backupDate\"", "\"clients\"", "\"projects\"", "\"userData\""]
        .iter()
        .map(|key| raw.find(key).unwrap())
        .collect();
    assert!(raw_keys.windows(2).all(|pair| pair[0] < pair[1]));

    assert_eq!(load_json_backup(&path).unwrap(), backup);
}

#[test]
fn csv_export_writes_projects_then_clients() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteLedgerRepository::new(&conn);
    seed(&repo);
    let config = LedgerConfig::default();

    let backup = BackupService::new(repo, &config)
        .create_full_backup(backup_date())
        .unwrap();
    let files = export_to_csv(&backup, dir.path());

    assert_eq!(
        files,
        vec![
            dir.path().join("ledger_projects_2025-07-01.csv"),
            dir.path().join("ledger_clients_2025-07-01.csv"),
        ]
    );

    let projects = std::fs::read_to_string(&files[0]).unwrap();
    assert_eq!(
        projects,
        "Project Name,Artist,Start Date,End Date,Media Type,Status,Fee Total,Client Name,Client Email,Items Count\n\
         \"Score, Reel 2\",Composer,2025-06-20,2025-06-20,Recording,Open,1500.25,Jane Doe,jane@example.com,2\n"
    );

    let clients = std::fs::read_to_string(&files[1]).unwrap();
    assert_eq!(
        clients,
        "Name,Email,Phone,Company,Address,City,State,Zip\n\
         Jane Doe,jane@example.com,,,\"12 Main St, Apt 4\",,,\n"
    );
}

#[test]
fn export_into_missing_directory_fails_softly() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let conn = open_db_in_memory().unwrap();
    let config = LedgerConfig::default();
    let service = BackupService::new(SqliteLedgerRepository::new(&conn), &config);

    assert_eq!(service.export_json(&missing, backup_date()), None);
    assert!(service.export_csv(&missing, backup_date()).is_empty());
}

#[test]
fn empty_ledger_exports_headers_only() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db_in_memory().unwrap();
    let config = LedgerConfig::default();
    let service = BackupService::new(SqliteLedgerRepository::new(&conn), &config);

    let files = service.export_csv(dir.path(), backup_date());
    assert_eq!(files.len(), 2);
    let projects = std::fs::read_to_string(&files[0]).unwrap();
    assert_eq!(projects.lines().count(), 1);
}

#[test]
fn loading_garbage_or_missing_backup_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let garbage = dir.path().join("ledger_backup_bad.json");
    std::fs::write(&garbage, "{ not json").unwrap();

    assert_eq!(load_json_backup(&garbage), Err(LedgerError::DataCorruption));
    assert_eq!(
        load_json_backup(&dir.path().join("nope.json")),
        Err(LedgerError::FileNotFound)
    );
}
