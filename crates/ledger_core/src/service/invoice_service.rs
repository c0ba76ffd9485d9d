//! Invoice numbering, naming and rendering hand-off.
//!
//! # Responsibility
//! - Issue the next invoice number and derive the document name.
//! - Build the render-ready `InvoiceDocument` and pass it to an `InvoiceRenderer`.
//!
//! # Invariants
//! - The issued number is always `current + 1`; overflow is a `CalculationError`.
//! - `render_invoice` only fails on numbering: a renderer error yields an invoice
//!   without a file.
//! - `Invoice.name` keeps the client name verbatim; the file on disk uses
//!   `sanitized_file_name`, which is always a single path component.
//! - This service does not persist; callers attach the invoice via
//!   `LedgerService::attach_invoice`.

use crate::config::{BankingInfo, Company, LedgerConfig};
use crate::error::{LedgerError, LedgerResult};
use crate::model::{Client, Invoice, Project};
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const UNKNOWN_CLIENT: &str = "Unknown";

/// Failure reported by an `InvoiceRenderer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderError(pub String);

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invoice render failed: {}", self.0)
    }
}

impl Error for RenderError {}

/// Failure of `InvoiceService::try_render_invoice`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceError {
    /// The next number could not be issued.
    Numbering(LedgerError),
    Render(RenderError),
}

impl Display for InvoiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numbering(err) => write!(f, "invoice numbering failed: {err}"),
            Self::Render(err) => write!(f, "{err}"),
        }
    }
}

impl Error for InvoiceError {}

impl From<LedgerError> for InvoiceError {
    fn from(value: LedgerError) -> Self {
        Self::Numbering(value)
    }
}

impl From<RenderError> for InvoiceError {
    fn from(value: RenderError) -> Self {
        Self::Render(value)
    }
}

/// One printed invoice line.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceLine {
    pub description: String,
    /// Item type display label.
    pub kind: &'static str,
    pub fee: f64,
}

/// Everything a renderer needs to lay out an invoice page.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDocument {
    pub number: i64,
    pub name: String,
    pub date: NaiveDate,
    pub sender_name: String,
    pub sender_company: Company,
    pub banking: BankingInfo,
    pub payer: Option<Client>,
    pub project_name: String,
    pub artist: String,
    pub lines: Vec<InvoiceLine>,
    pub total: f64,
}

/// Turns an `InvoiceDocument` into a file at `destination` (typically a PDF).
pub trait InvoiceRenderer {
    fn render(&self, document: &InvoiceDocument, destination: &Path) -> Result<(), RenderError>;
}

/// `Invoice_{number}_{client}_{YYYY-MM-DD}.pdf`; the client falls back to `Unknown`.
pub fn invoice_name(number: i64, client: Option<&Client>, date: NaiveDate) -> String {
    let client_name = client.map_or_else(|| UNKNOWN_CLIENT.to_string(), Client::full_name);
    format!("Invoice_{number}_{client_name}_{}.pdf", date.format("%Y-%m-%d"))
}

/// Maps an invoice name to a file name that stays inside the output directory.
///
/// Path separators, `:` and control characters become `-`. A result of `.` or
/// `..` is replaced wholesale.
pub fn sanitized_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if matches!(c, '/' | '\\' | ':') || c.is_control() {
                '-'
            } else {
                c
            }
        })
        .collect();
    match cleaned.trim() {
        "" | "." | ".." => "invoice.pdf".to_string(),
        _ => cleaned,
    }
}

fn issue_number(current_number: i64) -> LedgerResult<i64> {
    current_number.checked_add(1).ok_or_else(|| {
        warn!("event=invoice_number module=service status=overflow current={current_number}");
        LedgerError::CalculationError
    })
}

pub struct InvoiceService<'cfg, Rn: InvoiceRenderer> {
    renderer: Rn,
    config: &'cfg LedgerConfig,
    output_dir: PathBuf,
}

impl<'cfg, Rn: InvoiceRenderer> InvoiceService<'cfg, Rn> {
    /// Rendered files are written under `output_dir`.
    pub fn new(renderer: Rn, config: &'cfg LedgerConfig, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            config,
            output_dir: output_dir.into(),
        }
    }

    /// Builds the render input for `project` numbered `number`.
    pub fn build_document(
        &self,
        project: &Project,
        client: Option<&Client>,
        number: i64,
        date: NaiveDate,
    ) -> InvoiceDocument {
        let user = &self.config.user_data;
        InvoiceDocument {
            number,
            name: invoice_name(number, client, date),
            date,
            sender_name: user.full_name(),
            sender_company: user.company.clone(),
            banking: user.banking_info.clone(),
            payer: client.cloned(),
            project_name: project.project_name.clone(),
            artist: project.artist.clone(),
            lines: project
                .items
                .iter()
                .map(|item| InvoiceLine {
                    description: item.name.clone(),
                    kind: item.item_type.label(),
                    fee: item.fee,
                })
                .collect(),
            total: project.fee_total(),
        }
    }

    /// Issues invoice `current_number + 1` and renders it.
    ///
    /// A renderer failure is logged and produces an invoice with `file = None`.
    ///
    /// # Errors
    /// - `CalculationError` when `current_number + 1` overflows.
    pub fn render_invoice(
        &self,
        project: &Project,
        client: Option<&Client>,
        current_number: i64,
        date: NaiveDate,
    ) -> LedgerResult<Invoice> {
        let document = self.build_document(project, client, issue_number(current_number)?, date);
        let destination = self.destination(&document);

        let mut invoice = Invoice::new(document.number, document.name.clone());
        match self.renderer.render(&document, &destination) {
            Ok(()) => {
                info!(
                    "event=invoice_render module=service status=ok project_id={} number={}",
                    project.id, invoice.number
                );
                invoice.file = Some(destination);
            }
            Err(err) => warn!(
                "event=invoice_render module=service status=error project_id={} number={} error={err}",
                project.id, invoice.number
            ),
        }
        Ok(invoice)
    }

    /// Like `render_invoice`, but surfaces renderer failures.
    pub fn try_render_invoice(
        &self,
        project: &Project,
        client: Option<&Client>,
        current_number: i64,
        date: NaiveDate,
    ) -> Result<Invoice, InvoiceError> {
        let document = self.build_document(project, client, issue_number(current_number)?, date);
        let destination = self.destination(&document);

        self.renderer.render(&document, &destination)?;
        info!(
            "event=invoice_render module=service status=ok project_id={} number={}",
            project.id, document.number
        );
        Ok(Invoice {
            number: document.number,
            name: document.name,
            file: Some(destination),
        })
    }

    fn destination(&self, document: &InvoiceDocument) -> PathBuf {
        self.output_dir.join(sanitized_file_name(&document.name))
    }
}

/// Removes the rendered file of `invoice`.
///
/// # Errors
/// - `FileNotFound` when the invoice has no file or the file is already gone.
/// - `DataCorruption` for any other filesystem failure.
pub fn delete_invoice_file(invoice: &Invoice) -> LedgerResult<()> {
    let path = invoice.file.as_ref().ok_or(LedgerError::FileNotFound)?;
    match std::fs::remove_file(path) {
        Ok(()) => {
            info!(
                "event=invoice_file_delete module=service status=ok number={}",
                invoice.number
            );
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(
                "event=invoice_file_delete module=service status=missing number={}",
                invoice.number
            );
            Err(LedgerError::FileNotFound)
        }
        Err(err) => {
            warn!(
                "event=invoice_file_delete module=service status=error number={} error={err}",
                invoice.number
            );
            Err(LedgerError::DataCorruption)
        }
    }
}
