//! Ledger use-case services.
//!
//! # Responsibility
//! - Guard persistence with entity validation (`LedgerService`).
//! - Number, name and render invoices (`InvoiceService`).
//! - Snapshot and export the ledger (`BackupService` and the export functions).
//!
//! # Invariants
//! - Services return `LedgerError`; storage error types never leak to callers.
//! - Services take configuration by reference; there is no global settings state.

pub mod backup;
pub mod invoice_service;
pub mod ledger_service;

pub use backup::{
    create_full_backup, export_to_csv, export_to_json, load_json_backup, BackupService,
    ClientBackup, FullBackup, ItemBackup, ProjectBackup,
};
pub use invoice_service::{
    delete_invoice_file, invoice_name, sanitized_file_name, InvoiceDocument, InvoiceError,
    InvoiceLine, InvoiceRenderer, InvoiceService, RenderError,
};
pub use ledger_service::{LedgerService, RevenueSummary};
