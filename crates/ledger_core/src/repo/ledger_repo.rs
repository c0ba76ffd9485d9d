//! Project/client repository contract and SQLite implementation.
//!
//! # Invariants
//! - `save_project` replaces the project's items and invoice in the same
//!   transaction as the project row; readers never see a half-written project.
//! - Items come back in the order they were saved.
//! - Instants are stored as epoch milliseconds (UTC).

use crate::db::DbError;
use crate::model::{
    Client, ClientId, Invoice, Item, ItemType, MediaType, Project, ProjectId, ProjectStatus,
};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use uuid::Uuid;

const PROJECT_SELECT_SQL: &str = "SELECT
    uuid,
    project_name,
    artist,
    start_date,
    end_date,
    status,
    media_type,
    notes,
    delivered,
    paid,
    date_opened,
    date_delivered,
    date_closed,
    client_id
FROM projects";

const CLIENT_SELECT_SQL: &str = "SELECT
    uuid,
    first_name,
    last_name,
    email,
    phone,
    attention,
    address,
    address2,
    city,
    state,
    zip,
    notes,
    company
FROM clients";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound { entity: &'static str, id: Uuid },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted ledger data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filters for `list_projects`. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectListQuery {
    pub status: Option<ProjectStatus>,
    pub client_id: Option<ClientId>,
    pub paid: Option<bool>,
}

/// Storage surface used by the ledger services.
pub trait LedgerRepository {
    /// Projects matching `query`, newest start date first.
    fn list_projects(&self, query: &ProjectListQuery) -> RepoResult<Vec<Project>>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    /// Inserts or fully replaces the project, its items and its invoice.
    fn save_project(&self, project: &Project) -> RepoResult<()>;
    fn delete_project(&self, id: ProjectId) -> RepoResult<()>;
    /// Clients ordered by last name, first name, then company.
    fn list_clients(&self) -> RepoResult<Vec<Client>>;
    fn get_client(&self, id: ClientId) -> RepoResult<Option<Client>>;
    fn save_client(&self, client: &Client) -> RepoResult<()>;
    /// Deletes the client; its projects keep existing without a client.
    fn delete_client(&self, id: ClientId) -> RepoResult<()>;
}

pub struct SqliteLedgerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLedgerRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn load_children(&self, project: &mut Project) -> RepoResult<()> {
        let id = project.id.to_string();

        let mut stmt = self.conn.prepare(
            "SELECT name, fee, item_type, notes
             FROM items
             WHERE project_id = ?1
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([id.as_str()])?;
        while let Some(row) = rows.next()? {
            let type_text: String = row.get("item_type")?;
            let item_type = parse_item_type(&type_text).ok_or_else(|| {
                RepoError::InvalidData(format!("invalid item type `{type_text}` in items.item_type"))
            })?;
            project.items.push(Item {
                name: row.get("name")?,
                fee: row.get("fee")?,
                item_type,
                notes: row.get("notes")?,
            });
        }

        project.invoice = self
            .conn
            .query_row(
                "SELECT number, name, file_path FROM invoices WHERE project_id = ?1;",
                [id.as_str()],
                |row| {
                    Ok(Invoice {
                        number: row.get("number")?,
                        name: row.get("name")?,
                        file: row.get::<_, Option<String>>("file_path")?.map(PathBuf::from),
                    })
                },
            )
            .optional()?;

        Ok(())
    }
}

impl LedgerRepository for SqliteLedgerRepository<'_> {
    fn list_projects(&self, query: &ProjectListQuery) -> RepoResult<Vec<Project>> {
        let mut sql = format!("{PROJECT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status_to_db(status).to_string()));
        }
        if let Some(client_id) = query.client_id {
            sql.push_str(" AND client_id = ?");
            bind_values.push(Value::Text(client_id.to_string()));
        }
        if let Some(paid) = query.paid {
            sql.push_str(" AND paid = ?");
            bind_values.push(Value::Integer(bool_to_int(paid)));
        }
        sql.push_str(" ORDER BY start_date DESC, uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        drop(rows);

        for project in &mut projects {
            self.load_children(project)?;
        }
        Ok(projects)
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let mut project = parse_project_row(row)?;
        drop(rows);

        self.load_children(&mut project)?;
        Ok(Some(project))
    }

    fn save_project(&self, project: &Project) -> RepoResult<()> {
        let id = project.id.to_string();
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO projects (
                uuid,
                project_name,
                artist,
                start_date,
                end_date,
                status,
                media_type,
                notes,
                delivered,
                paid,
                date_opened,
                date_delivered,
                date_closed,
                client_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ON CONFLICT(uuid) DO UPDATE SET
                project_name = excluded.project_name,
                artist = excluded.artist,
                start_date = excluded.start_date,
                end_date = excluded.end_date,
                status = excluded.status,
                media_type = excluded.media_type,
                notes = excluded.notes,
                delivered = excluded.delivered,
                paid = excluded.paid,
                date_opened = excluded.date_opened,
                date_delivered = excluded.date_delivered,
                date_closed = excluded.date_closed,
                client_id = excluded.client_id;",
            params![
                id.as_str(),
                project.project_name.as_str(),
                project.artist.as_str(),
                project.start_date.timestamp_millis(),
                project.end_date.timestamp_millis(),
                status_to_db(project.status),
                media_type_to_db(project.media_type),
                project.notes.as_str(),
                bool_to_int(project.delivered),
                bool_to_int(project.paid),
                project.date_opened.timestamp_millis(),
                project.date_delivered.map(|at| at.timestamp_millis()),
                project.date_closed.map(|at| at.timestamp_millis()),
                project.client_id.map(|client_id| client_id.to_string()),
            ],
        )?;

        tx.execute("DELETE FROM items WHERE project_id = ?1;", [id.as_str()])?;
        {
            let mut insert_item = tx.prepare(
                "INSERT INTO items (project_id, position, name, fee, item_type, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            )?;
            for (position, item) in project.items.iter().enumerate() {
                insert_item.execute(params![
                    id.as_str(),
                    position as i64,
                    item.name.as_str(),
                    item.fee,
                    item_type_to_db(item.item_type),
                    item.notes.as_str(),
                ])?;
            }
        }

        tx.execute("DELETE FROM invoices WHERE project_id = ?1;", [id.as_str()])?;
        if let Some(invoice) = &project.invoice {
            tx.execute(
                "INSERT INTO invoices (project_id, number, name, file_path)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    id.as_str(),
                    invoice.number,
                    invoice.name.as_str(),
                    invoice
                        .file
                        .as_ref()
                        .map(|path| path.to_string_lossy().into_owned()),
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "project",
                id,
            });
        }
        Ok(())
    }

    fn list_clients(&self) -> RepoResult<Vec<Client>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CLIENT_SELECT_SQL} ORDER BY last_name ASC, first_name ASC, company ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut clients = Vec::new();
        while let Some(row) = rows.next()? {
            clients.push(parse_client_row(row)?);
        }
        Ok(clients)
    }

    fn get_client(&self, id: ClientId) -> RepoResult<Option<Client>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CLIENT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_client_row(row)?)),
            None => Ok(None),
        }
    }

    fn save_client(&self, client: &Client) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO clients (
                uuid,
                first_name,
                last_name,
                email,
                phone,
                attention,
                address,
                address2,
                city,
                state,
                zip,
                notes,
                company
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ON CONFLICT(uuid) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                email = excluded.email,
                phone = excluded.phone,
                attention = excluded.attention,
                address = excluded.address,
                address2 = excluded.address2,
                city = excluded.city,
                state = excluded.state,
                zip = excluded.zip,
                notes = excluded.notes,
                company = excluded.company;",
            params![
                client.id.to_string(),
                client.first_name.as_str(),
                client.last_name.as_str(),
                client.email.as_str(),
                client.phone.as_str(),
                client.attention.as_str(),
                client.address.as_str(),
                client.address2.as_str(),
                client.city.as_str(),
                client.state.as_str(),
                client.zip.as_str(),
                client.notes.as_str(),
                client.company.as_str(),
            ],
        )?;
        Ok(())
    }

    fn delete_client(&self, id: ClientId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM clients WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "client", id });
        }
        Ok(())
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in projects.status"))
    })?;

    let media_text: String = row.get("media_type")?;
    let media_type = parse_media_type(&media_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid media type `{media_text}` in projects.media_type"
        ))
    })?;

    let client_id = match row.get::<_, Option<String>>("client_id")? {
        Some(text) => Some(parse_uuid(&text, "projects.client_id")?),
        None => None,
    };

    Ok(Project {
        id: parse_uuid(&row.get::<_, String>("uuid")?, "projects.uuid")?,
        project_name: row.get("project_name")?,
        artist: row.get("artist")?,
        start_date: millis_to_utc(row.get("start_date")?, "projects.start_date")?,
        end_date: millis_to_utc(row.get("end_date")?, "projects.end_date")?,
        status,
        media_type,
        notes: row.get("notes")?,
        delivered: int_to_bool(row.get("delivered")?, "projects.delivered")?,
        paid: int_to_bool(row.get("paid")?, "projects.paid")?,
        date_opened: millis_to_utc(row.get("date_opened")?, "projects.date_opened")?,
        date_delivered: optional_millis(row.get("date_delivered")?, "projects.date_delivered")?,
        date_closed: optional_millis(row.get("date_closed")?, "projects.date_closed")?,
        client_id,
        invoice: None,
        items: Vec::new(),
    })
}

fn parse_client_row(row: &Row<'_>) -> RepoResult<Client> {
    Ok(Client {
        id: parse_uuid(&row.get::<_, String>("uuid")?, "clients.uuid")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        attention: row.get("attention")?,
        address: row.get("address")?,
        address2: row.get("address2")?,
        city: row.get("city")?,
        state: row.get("state")?,
        zip: row.get("zip")?,
        notes: row.get("notes")?,
        company: row.get("company")?,
    })
}

fn parse_uuid(text: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {column}")))
}

fn millis_to_utc(millis: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
        RepoError::InvalidData(format!("out-of-range instant `{millis}` in {column}"))
    })
}

fn optional_millis(millis: Option<i64>, column: &str) -> RepoResult<Option<DateTime<Utc>>> {
    millis.map(|value| millis_to_utc(value, column)).transpose()
}

fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

fn status_to_db(status: ProjectStatus) -> &'static str {
    match status {
        ProjectStatus::Open => "open",
        ProjectStatus::Delivered => "delivered",
        ProjectStatus::Closed => "closed",
    }
}

fn parse_status(value: &str) -> Option<ProjectStatus> {
    ProjectStatus::ALL
        .into_iter()
        .find(|status| status_to_db(*status) == value)
}

fn media_type_to_db(kind: MediaType) -> &'static str {
    match kind {
        MediaType::Film => "film",
        MediaType::Tv => "tv",
        MediaType::Recording => "recording",
        MediaType::Game => "game",
        MediaType::Concert => "concert",
        MediaType::Tour => "tour",
        MediaType::Lesson => "lesson",
        MediaType::Other => "other",
    }
}

fn parse_media_type(value: &str) -> Option<MediaType> {
    MediaType::ALL
        .into_iter()
        .find(|kind| media_type_to_db(*kind) == value)
}

fn item_type_to_db(kind: ItemType) -> &'static str {
    match kind {
        ItemType::Session => "session",
        ItemType::Overdub => "overdub",
        ItemType::Demo => "demo",
        ItemType::Rehearsal => "rehearsal",
        ItemType::Concert => "concert",
        ItemType::Tour => "tour",
        ItemType::PerDiem => "per_diem",
        ItemType::Reimbursement => "reimbursement",
        ItemType::Arrangement => "arrangement",
        ItemType::Score => "score",
        ItemType::Production => "production",
        ItemType::Rental => "rental",
        ItemType::Lesson => "lesson",
        ItemType::Other => "other",
    }
}

fn parse_item_type(value: &str) -> Option<ItemType> {
    ItemType::ALL
        .into_iter()
        .find(|kind| item_type_to_db(*kind) == value)
}

#[cfg(test)]
mod tests {
    use super::{
        item_type_to_db, media_type_to_db, parse_item_type, parse_media_type, parse_status,
        status_to_db,
    };
    use crate::model::{ItemType, MediaType, ProjectStatus};

    #[test]
    fn enum_keys_are_unique_and_reversible() {
        for kind in ItemType::ALL {
            assert_eq!(parse_item_type(item_type_to_db(kind)), Some(kind));
        }
        for kind in MediaType::ALL {
            assert_eq!(parse_media_type(media_type_to_db(kind)), Some(kind));
        }
        for status in ProjectStatus::ALL {
            assert_eq!(parse_status(status_to_db(status)), Some(status));
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert_eq!(parse_item_type("Tracking Session"), None);
        assert_eq!(parse_status("paid"), None);
    }
}
