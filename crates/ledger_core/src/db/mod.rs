//! SQLite storage bootstrap for the ledger.
//!
//! # Responsibility
//! - Open file or in-memory connections configured for the ledger schema.
//! - Apply schema migrations before any repository touches data.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - A database written by a newer build is refused, never downgraded.
//! - A failed migration names the step that broke; earlier steps roll back with it.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage failure below the repository layer.
#[derive(Debug)]
pub enum DbError {
    /// Query, pragma or connection failure outside of migrations.
    Sqlite(rusqlite::Error),
    /// Migration `version` could not be applied to the ledger file.
    Migration { version: u32, source: rusqlite::Error },
    /// The ledger file was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
}

impl DbError {
    /// Migration step involved in the failure, if any.
    pub fn schema_version(&self) -> Option<u32> {
        match self {
            Self::Sqlite(_) => None,
            Self::Migration { version, .. } => Some(*version),
            Self::SchemaTooNew { found, .. } => Some(*found),
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "ledger storage error: {err}"),
            Self::Migration { version, source } => {
                write!(f, "ledger migration {version:04} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "ledger file has schema {found}, this build reads up to {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
