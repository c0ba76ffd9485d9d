//! FFI use-case API for the Flutter ledger UI.
//!
//! # Responsibility
//! - Expose validation, money and export use-cases to Dart via FRB.
//! - Convert between FFI-friendly shapes (epoch ms, strings) and core types.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Failures come back inside the response envelope, never as a crash.
//! - Database and settings are passed in per call; nothing here is global.

use chrono::{DateTime, TimeZone, Utc};
use ledger_core::db::open_db;
use ledger_core::service::{export_to_csv, export_to_json, invoice_name, BackupService};
use ledger_core::validation::{client_form, phone, project_form};
use ledger_core::{
    core_version as core_version_inner, default_log_level as default_log_level_inner,
    calculate_fee_total, init_logging as init_logging_inner, ping as ping_inner, Client, Item,
    ItemType, LedgerConfig, LedgerService, SqliteLedgerRepository, ValidationResult,
};
use log::warn;
use std::path::Path;

const INVALID_INSTANT_MESSAGE: &str = "Invalid date range";

/// Health-check for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

#[flutter_rust_bridge::frb(sync)]
pub fn default_log_level() -> String {
    default_log_level_inner().to_owned()
}

/// Starts core logging once per process.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`.
/// - Returns an empty string on success and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Outcome of one field validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCheck {
    pub is_valid: bool,
    /// Empty when valid.
    pub message: String,
}

impl From<ValidationResult> for FieldCheck {
    fn from(value: ValidationResult) -> Self {
        Self {
            is_valid: value.is_valid,
            message: value.error_message.unwrap_or_default(),
        }
    }
}

/// Envelope for calls that touch the database or filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerActionResponse {
    pub ok: bool,
    /// Written file paths, when the call exports.
    pub files: Vec<String>,
    /// User-facing message; recovery hint appended on failure.
    pub message: String,
}

impl LedgerActionResponse {
    fn success(message: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            ok: true,
            files,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            files: Vec::new(),
            message: message.into(),
        }
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn validate_project_name(name: String) -> FieldCheck {
    project_form::validate_project_name(&name).into()
}

#[flutter_rust_bridge::frb(sync)]
pub fn validate_artist(artist: String) -> FieldCheck {
    project_form::validate_artist(&artist).into()
}

/// Date range rule over epoch milliseconds (UTC).
#[flutter_rust_bridge::frb(sync)]
pub fn validate_date_range(start_epoch_ms: i64, end_epoch_ms: i64) -> FieldCheck {
    match (instant(start_epoch_ms), instant(end_epoch_ms)) {
        (Some(start), Some(end)) => project_form::validate_date_range(start, end).into(),
        _ => ValidationResult::invalid(INVALID_INSTANT_MESSAGE).into(),
    }
}

/// Only checks that a client is selected.
///
/// `None` and a blank string both mean "no selection"; any other id passes
/// without being parsed.
#[flutter_rust_bridge::frb(sync)]
pub fn validate_client_selection(client_id: Option<String>) -> FieldCheck {
    match client_id.filter(|raw| !raw.trim().is_empty()) {
        Some(_) => ValidationResult::valid().into(),
        None => project_form::validate_client(None).into(),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn validate_client_identity(first_name: String, last_name: String, company: String) -> FieldCheck {
    client_form::validate_client_identity(&first_name, &last_name, &company).into()
}

#[flutter_rust_bridge::frb(sync)]
pub fn validate_email(email: String) -> FieldCheck {
    client_form::validate_email(&email).into()
}

#[flutter_rust_bridge::frb(sync)]
pub fn validate_phone(phone: String) -> FieldCheck {
    client_form::validate_phone(&phone).into()
}

/// US phone grouping applied while the user types.
#[flutter_rust_bridge::frb(sync)]
pub fn format_phone_as_typing(input: String) -> String {
    phone::format_as_typing(&input)
}

/// Sum of line-item fees, `0.0` for none.
#[flutter_rust_bridge::frb(sync)]
pub fn fee_total(fees: Vec<f64>) -> f64 {
    let items: Vec<Item> = fees
        .into_iter()
        .map(|fee| Item::new(String::new(), fee, ItemType::Other))
        .collect();
    calculate_fee_total(&items)
}

/// File name for invoice `number` issued at `date_epoch_ms`.
///
/// `client_name` is the already-formatted client name; `None` means no client.
#[flutter_rust_bridge::frb(sync)]
pub fn invoice_file_name(number: i64, client_name: Option<String>, date_epoch_ms: i64) -> String {
    let client = client_name.map(Client::company);
    let date = instant(date_epoch_ms).unwrap_or_else(Utc::now).date_naive();
    invoice_name(number, client.as_ref(), date)
}

/// Highest invoice number stored in the ledger at `db_path`.
///
/// Returns `initial_invoice_number` for an empty ledger and on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn next_invoice_number(db_path: String, initial_invoice_number: i64) -> i64 {
    let config = LedgerConfig {
        initial_invoice_number,
        ..LedgerConfig::default()
    };
    let conn = match open_db(db_path.trim()) {
        Ok(conn) => conn,
        Err(err) => {
            warn!("event=ffi_next_invoice_number module=ffi status=error error={err}");
            return initial_invoice_number;
        }
    };
    LedgerService::new(SqliteLedgerRepository::new(&conn), &config)
        .next_invoice_number()
        .unwrap_or(initial_invoice_number)
}

/// Writes a JSON backup of the ledger at `db_path` into `output_dir`.
///
/// `config_json` is the saved settings JSON (may be empty for defaults).
#[flutter_rust_bridge::frb(sync)]
pub fn export_backup_json(db_path: String, output_dir: String, config_json: String) -> LedgerActionResponse {
    run_export(&db_path, &output_dir, &config_json, |backup, dir| {
        export_to_json(backup, dir).into_iter().collect()
    })
}

/// Writes the projects and clients CSV files into `output_dir`.
///
/// A partial export (projects written, clients failed) reports `ok = true`
/// with only the written file listed.
#[flutter_rust_bridge::frb(sync)]
pub fn export_backup_csv(db_path: String, output_dir: String, config_json: String) -> LedgerActionResponse {
    run_export(&db_path, &output_dir, &config_json, export_to_csv)
}

fn run_export(
    db_path: &str,
    output_dir: &str,
    config_json: &str,
    write: impl FnOnce(&ledger_core::service::FullBackup, &Path) -> Vec<std::path::PathBuf>,
) -> LedgerActionResponse {
    let config = if config_json.trim().is_empty() {
        LedgerConfig::default()
    } else {
        match LedgerConfig::from_json_str(config_json) {
            Ok(config) => config,
            Err(err) => return failure_with_hint(&err),
        }
    };

    let conn = match open_db(db_path.trim()) {
        Ok(conn) => conn,
        Err(err) => return LedgerActionResponse::failure(format!("ledger DB open failed: {err}")),
    };
    let service = BackupService::new(SqliteLedgerRepository::new(&conn), &config);
    let backup = match service.create_full_backup(Utc::now()) {
        Ok(backup) => backup,
        Err(err) => return failure_with_hint(&err),
    };

    let files: Vec<String> = write(&backup, Path::new(output_dir.trim()))
        .into_iter()
        .map(|path| path.to_string_lossy().into_owned())
        .collect();
    if files.is_empty() {
        LedgerActionResponse::failure("Export failed. Check available storage and try again.")
    } else {
        LedgerActionResponse::success(format!("Exported {} file(s).", files.len()), files)
    }
}

fn failure_with_hint(err: &ledger_core::LedgerError) -> LedgerActionResponse {
    LedgerActionResponse::failure(format!("{err} {}", err.recovery_suggestion()))
}

fn instant(epoch_ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(epoch_ms).single()
}
