//! Core ledger logic for freelance musicians: projects, clients, items and invoices.
//! This crate is the single source of truth for validation and money rules.

pub mod config;
pub mod db;
pub mod error;
pub mod finance;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use config::{BankingInfo, Company, LedgerConfig, UserData};
pub use error::{LedgerError, LedgerResult};
pub use finance::{calculate_fee_total, next_invoice_number, projects_fee_total};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    Client, ClientId, Invoice, Item, ItemType, MediaType, Project, ProjectId, ProjectStatus,
};
pub use repo::{LedgerRepository, ProjectListQuery, RepoError, RepoResult, SqliteLedgerRepository};
pub use service::{BackupService, InvoiceRenderer, InvoiceService, LedgerService};
pub use validation::{FormValidationState, ProjectField, ValidationResult, Validatable};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
