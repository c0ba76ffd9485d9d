//! Persistence contracts and their SQLite implementation.
//!
//! # Responsibility
//! - Define the fetch/save/delete surface services use for projects and clients.
//! - Keep SQL and row mapping out of the service layer.
//!
//! # Invariants
//! - Repositories do not validate; the save boundary in `service` does.
//! - Read paths reject unknown enum keys and malformed ids instead of guessing.

pub mod ledger_repo;

pub use ledger_repo::{
    LedgerRepository, ProjectListQuery, RepoError, RepoResult, SqliteLedgerRepository,
};
