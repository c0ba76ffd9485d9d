//! Full-ledger backup snapshot and its JSON/CSV exports.
//!
//! # Responsibility
//! - Flatten projects (with denormalized client, items, invoice) and clients
//!   into a serializable snapshot.
//! - Write that snapshot as pretty JSON with sorted keys, or as two CSV files.
//! - Read a JSON backup back into memory.
//!
//! # Invariants
//! - Building the snapshot is read-only.
//! - Instants are written as ISO-8601 UTC with second precision (`...Z`).
//! - Export failures are logged and reported as `None` / a shorter file list;
//!   a CSV file that was already written is not rolled back.

use crate::config::{LedgerConfig, UserData};
use crate::error::{LedgerError, LedgerResult};
use crate::model::{Client, Project};
use crate::repo::{LedgerRepository, ProjectListQuery};
use crate::service::ledger_service::storage_failure;
use chrono::{DateTime, Utc};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const PROJECTS_CSV_HEADER: &str =
    "Project Name,Artist,Start Date,End Date,Media Type,Status,Fee Total,Client Name,Client Email,Items Count";
const CLIENTS_CSV_HEADER: &str = "Name,Email,Phone,Company,Address,City,State,Zip";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBackup {
    pub name: String,
    pub fee: f64,
    pub item_type: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBackup {
    pub id: String,
    pub project_name: String,
    pub artist: String,
    #[serde(with = "iso8601")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "iso8601")]
    pub end_date: DateTime<Utc>,
    pub media_type: String,
    pub status: String,
    pub notes: String,
    pub delivered: bool,
    pub paid: bool,
    #[serde(with = "iso8601")]
    pub date_opened: DateTime<Utc>,
    #[serde(with = "iso8601::option", default)]
    pub date_delivered: Option<DateTime<Utc>>,
    #[serde(with = "iso8601::option", default)]
    pub date_closed: Option<DateTime<Utc>>,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub client_company: String,
    pub items: Vec<ItemBackup>,
    pub invoice_number: Option<i64>,
    pub invoice_name: Option<String>,
}

impl ProjectBackup {
    pub fn fee_total(&self) -> f64 {
        self.items.iter().map(|item| item.fee).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientBackup {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullBackup {
    #[serde(with = "iso8601")]
    pub backup_date: DateTime<Utc>,
    pub app_version: String,
    pub projects: Vec<ProjectBackup>,
    pub clients: Vec<ClientBackup>,
    pub user_data: UserData,
}

/// Flattens an already-fetched ledger into a backup snapshot.
///
/// A project whose `client_id` is not among `clients` gets blank client fields.
pub fn create_full_backup(
    projects: &[Project],
    clients: &[Client],
    config: &LedgerConfig,
    backup_date: DateTime<Utc>,
) -> FullBackup {
    FullBackup {
        backup_date,
        app_version: config.app_version.clone(),
        projects: projects
            .iter()
            .map(|project| {
                let client = project
                    .client_id
                    .and_then(|id| clients.iter().find(|client| client.id == id));
                project_backup(project, client)
            })
            .collect(),
        clients: clients.iter().map(client_backup).collect(),
        user_data: config.user_data.clone(),
    }
}

fn project_backup(project: &Project, client: Option<&Client>) -> ProjectBackup {
    let client_field = |read: fn(&Client) -> String| client.map(read).unwrap_or_default();

    ProjectBackup {
        id: project.id.to_string(),
        project_name: project.project_name.clone(),
        artist: project.artist.clone(),
        start_date: project.start_date,
        end_date: project.end_date,
        media_type: project.media_type.label().to_string(),
        status: project.status.label().to_string(),
        notes: project.notes.clone(),
        delivered: project.delivered,
        paid: project.paid,
        date_opened: project.date_opened,
        date_delivered: project.date_delivered,
        date_closed: project.date_closed,
        client_name: client_field(Client::full_name),
        client_email: client_field(|c| c.email.clone()),
        client_phone: client_field(|c| c.phone.clone()),
        client_company: client_field(|c| c.company.clone()),
        items: project
            .items
            .iter()
            .map(|item| ItemBackup {
                name: item.name.clone(),
                fee: item.fee,
                item_type: item.item_type.label().to_string(),
                notes: item.notes.clone(),
            })
            .collect(),
        invoice_number: project.invoice.as_ref().map(|invoice| invoice.number),
        invoice_name: project.invoice.as_ref().map(|invoice| invoice.name.clone()),
    }
}

fn client_backup(client: &Client) -> ClientBackup {
    ClientBackup {
        id: client.id.to_string(),
        first_name: client.first_name.clone(),
        last_name: client.last_name.clone(),
        email: client.email.clone(),
        phone: client.phone.clone(),
        company: client.company.clone(),
        address: client.address.clone(),
        city: client.city.clone(),
        state: client.state.clone(),
        zip: client.zip.clone(),
        notes: client.notes.clone(),
    }
}

/// Pretty JSON with object keys in sorted order.
pub fn backup_to_json(backup: &FullBackup) -> LedgerResult<String> {
    // `serde_json::Map` is BTreeMap-backed, so going through `Value` sorts keys.
    serde_json::to_value(backup)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .map_err(|err| {
            error!("event=backup_encode module=service status=error error={err}");
            LedgerError::DataCorruption
        })
}

pub fn projects_csv(projects: &[ProjectBackup]) -> String {
    let mut csv = format!("{PROJECTS_CSV_HEADER}\n");
    for project in projects {
        let row = [
            escape_csv(&project.project_name),
            escape_csv(&project.artist),
            project.start_date.format("%Y-%m-%d").to_string(),
            project.end_date.format("%Y-%m-%d").to_string(),
            project.media_type.clone(),
            project.status.clone(),
            format!("{:.2}", project.fee_total()),
            escape_csv(&project.client_name),
            escape_csv(&project.client_email),
            project.items.len().to_string(),
        ];
        csv.push_str(&row.join(","));
        csv.push('\n');
    }
    csv
}

pub fn clients_csv(clients: &[ClientBackup]) -> String {
    let mut csv = format!("{CLIENTS_CSV_HEADER}\n");
    for client in clients {
        let name = format!("{} {}", client.first_name, client.last_name);
        let row = [
            escape_csv(name.trim()),
            escape_csv(&client.email),
            escape_csv(&client.phone),
            escape_csv(&client.company),
            escape_csv(&client.address),
            escape_csv(&client.city),
            escape_csv(&client.state),
            escape_csv(&client.zip),
        ];
        csv.push_str(&row.join(","));
        csv.push('\n');
    }
    csv
}

/// Quotes values containing a comma, quote or newline, doubling inner quotes.
pub fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn json_backup_file_name(backup_date: DateTime<Utc>) -> String {
    format!("ledger_backup_{}.json", backup_date.format("%Y-%m-%d"))
}

pub fn projects_csv_file_name(backup_date: DateTime<Utc>) -> String {
    format!("ledger_projects_{}.csv", backup_date.format("%Y-%m-%d"))
}

pub fn clients_csv_file_name(backup_date: DateTime<Utc>) -> String {
    format!("ledger_clients_{}.csv", backup_date.format("%Y-%m-%d"))
}

/// Writes `backup` as JSON under `dir`. Returns `None` on any failure.
pub fn export_to_json(backup: &FullBackup, dir: &Path) -> Option<PathBuf> {
    let json = backup_to_json(backup).ok()?;
    write_export("json_export", dir.join(json_backup_file_name(backup.backup_date)), &json)
}

/// Writes the projects CSV and then the clients CSV under `dir`.
///
/// Returns the files that were written; a failed file is skipped and logged.
pub fn export_to_csv(backup: &FullBackup, dir: &Path) -> Vec<PathBuf> {
    let projects = write_export(
        "projects_csv_export",
        dir.join(projects_csv_file_name(backup.backup_date)),
        &projects_csv(&backup.projects),
    );
    let clients = write_export(
        "clients_csv_export",
        dir.join(clients_csv_file_name(backup.backup_date)),
        &clients_csv(&backup.clients),
    );
    projects.into_iter().chain(clients).collect()
}

/// Reads a backup written by `export_to_json`.
///
/// # Errors
/// - `FileNotFound` when `path` does not exist.
/// - `DataCorruption` when the file cannot be read or decoded.
pub fn load_json_backup(path: &Path) -> LedgerResult<FullBackup> {
    let raw = std::fs::read_to_string(path).map_err(|err| {
        error!("event=backup_load module=service status=error error={err}");
        if err.kind() == std::io::ErrorKind::NotFound {
            LedgerError::FileNotFound
        } else {
            LedgerError::DataCorruption
        }
    })?;

    let backup: FullBackup = serde_json::from_str(&raw).map_err(|err| {
        error!("event=backup_load module=service status=error error={err}");
        LedgerError::DataCorruption
    })?;
    info!(
        "event=backup_load module=service status=ok projects={} clients={}",
        backup.projects.len(),
        backup.clients.len()
    );
    Ok(backup)
}

fn write_export(event: &str, path: PathBuf, contents: &str) -> Option<PathBuf> {
    match std::fs::write(&path, contents) {
        Ok(()) => {
            info!(
                "event={event} module=service status=ok bytes={} path={}",
                contents.len(),
                path.display()
            );
            Some(path)
        }
        Err(err) => {
            error!(
                "event={event} module=service status=error path={} error={err}",
                path.display()
            );
            None
        }
    }
}

/// Snapshots stored ledger data for export.
pub struct BackupService<'cfg, R: LedgerRepository> {
    repo: R,
    config: &'cfg LedgerConfig,
}

impl<'cfg, R: LedgerRepository> BackupService<'cfg, R> {
    pub fn new(repo: R, config: &'cfg LedgerConfig) -> Self {
        Self { repo, config }
    }

    /// Fetches every project and client and flattens them.
    ///
    /// # Errors
    /// - `DataCorruption` when either fetch fails.
    pub fn create_full_backup(&self, backup_date: DateTime<Utc>) -> LedgerResult<FullBackup> {
        let projects = self
            .repo
            .list_projects(&ProjectListQuery::default())
            .map_err(|err| storage_failure("backup_create", err))?;
        let clients = self
            .repo
            .list_clients()
            .map_err(|err| storage_failure("backup_create", err))?;

        let backup = create_full_backup(&projects, &clients, self.config, backup_date);
        info!(
            "event=backup_create module=service status=ok projects={} clients={}",
            backup.projects.len(),
            backup.clients.len()
        );
        Ok(backup)
    }

    /// Snapshot plus JSON export in one call. `None` when either step fails.
    pub fn export_json(&self, dir: &Path, backup_date: DateTime<Utc>) -> Option<PathBuf> {
        let backup = self.create_full_backup(backup_date).ok()?;
        export_to_json(&backup, dir)
    }

    /// Snapshot plus CSV export in one call. Empty when the snapshot fails.
    pub fn export_csv(&self, dir: &Path, backup_date: DateTime<Utc>) -> Vec<PathBuf> {
        match self.create_full_backup(backup_date) {
            Ok(backup) => export_to_csv(&backup, dir),
            Err(_) => Vec::new(),
        }
    }
}

mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            at: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match at {
                Some(at) => super::serialize(at, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            raw.map(|raw| {
                DateTime::parse_from_rfc3339(&raw)
                    .map(|at| at.with_timezone(&Utc))
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
        }
    }
}
