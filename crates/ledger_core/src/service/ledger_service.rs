//! Save boundary for projects and clients.
//!
//! # Responsibility
//! - Veto writes of records that fail entity validation.
//! - Translate storage failures into user-facing `LedgerError`s.
//! - Answer read-side questions (next invoice number, revenue) over stored data.
//!
//! # Invariants
//! - Nothing reaches the repository without passing `validate_project` /
//!   `Validatable::validate` first.
//! - A failed save leaves the caller's in-memory record untouched so it can retry.

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::finance::{
    income_by_period, media_type_totals, next_invoice_number, projects_fee_total, MediaTypeTotal,
    PeriodTotal, TimeRange,
};
use crate::model::{Client, ClientId, Invoice, Project, ProjectId};
use crate::repo::{LedgerRepository, ProjectListQuery, RepoError};
use crate::validation::{validate_project, Validatable};
use chrono::NaiveDate;
use log::{error, info, warn};
use std::io::ErrorKind;

/// Chart-ready revenue figures for one time range.
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueSummary {
    /// Fee total over every stored project, paid or not.
    pub booked_total: f64,
    /// Fee total over paid projects only.
    pub paid_total: f64,
    pub by_media_type: Vec<MediaTypeTotal>,
    pub by_period: Vec<PeriodTotal>,
}

pub struct LedgerService<'cfg, R: LedgerRepository> {
    repo: R,
    config: &'cfg LedgerConfig,
}

impl<'cfg, R: LedgerRepository> LedgerService<'cfg, R> {
    pub fn new(repo: R, config: &'cfg LedgerConfig) -> Self {
        Self { repo, config }
    }

    /// Validates and persists a project with its items and invoice.
    ///
    /// # Errors
    /// - Entity validation errors (`EmptyRequiredField`, `InvalidDateRange`, ...).
    /// - `ValidationFailed` for a negative or non-finite item fee.
    /// - `DataCorruption` when the write fails.
    pub fn save_project(&self, project: &Project) -> LedgerResult<()> {
        if let Err(err) = self.check_project(project) {
            info!(
                "event=project_save module=service status=rejected project_id={} code={}",
                project.id,
                err.code()
            );
            return Err(err);
        }

        self.repo
            .save_project(project)
            .map_err(|err| storage_failure("project_save", err))?;
        info!(
            "event=project_save module=service status=ok project_id={} items={}",
            project.id,
            project.items.len()
        );
        Ok(())
    }

    /// Validates and persists a client.
    pub fn save_client(&self, client: &Client) -> LedgerResult<()> {
        if let Err(err) = client.validate() {
            info!(
                "event=client_save module=service status=rejected client_id={} code={}",
                client.id,
                err.code()
            );
            return Err(err);
        }

        self.repo
            .save_client(client)
            .map_err(|err| storage_failure("client_save", err))?;
        info!(
            "event=client_save module=service status=ok client_id={}",
            client.id
        );
        Ok(())
    }

    pub fn get_project(&self, id: ProjectId) -> LedgerResult<Project> {
        self.repo
            .get_project(id)
            .map_err(|err| storage_failure("project_get", err))?
            .ok_or_else(|| LedgerError::UnexpectedNilValue("project".to_string()))
    }

    pub fn get_client(&self, id: ClientId) -> LedgerResult<Client> {
        self.repo
            .get_client(id)
            .map_err(|err| storage_failure("client_get", err))?
            .ok_or_else(|| LedgerError::UnexpectedNilValue("client".to_string()))
    }

    pub fn list_projects(&self, query: &ProjectListQuery) -> LedgerResult<Vec<Project>> {
        self.repo
            .list_projects(query)
            .map_err(|err| storage_failure("project_list", err))
    }

    pub fn list_clients(&self) -> LedgerResult<Vec<Client>> {
        self.repo
            .list_clients()
            .map_err(|err| storage_failure("client_list", err))
    }

    /// Deletes a project and its rendered invoice PDF.
    ///
    /// The PDF is removed only after the row delete succeeds, so a failed
    /// delete leaves both in place. A PDF that is already gone is logged and skipped.
    pub fn delete_project(&self, id: ProjectId) -> LedgerResult<()> {
        let project = self.get_project(id)?;

        self.repo
            .delete_project(id)
            .map_err(|err| storage_failure("project_delete", err))?;
        info!("event=project_delete module=service status=ok project_id={id}");

        if let Some(path) = project.invoice.as_ref().and_then(|invoice| invoice.file.as_ref()) {
            match std::fs::remove_file(path) {
                Ok(()) => info!("event=invoice_file_delete module=service status=ok project_id={id}"),
                Err(err) if err.kind() == ErrorKind::NotFound => warn!(
                    "event=invoice_file_delete module=service status=missing project_id={id}"
                ),
                Err(err) => warn!(
                    "event=invoice_file_delete module=service status=error project_id={id} error={err}"
                ),
            }
        }
        Ok(())
    }

    /// Deletes a client. Its projects stay, without a client.
    pub fn delete_client(&self, id: ClientId) -> LedgerResult<()> {
        self.repo
            .delete_client(id)
            .map_err(|err| storage_failure("client_delete", err))?;
        info!("event=client_delete module=service status=ok client_id={id}");
        Ok(())
    }

    /// Stores `invoice` on the project, replacing any earlier invoice.
    pub fn attach_invoice(&self, project_id: ProjectId, invoice: Invoice) -> LedgerResult<Project> {
        let mut project = self.get_project(project_id)?;
        let number = invoice.number;
        project.invoice = Some(invoice);

        self.repo
            .save_project(&project)
            .map_err(|err| storage_failure("invoice_attach", err))?;
        info!(
            "event=invoice_attach module=service status=ok project_id={project_id} number={number}"
        );
        Ok(project)
    }

    /// Highest invoice number in use, for `InvoiceService::render_invoice`.
    pub fn next_invoice_number(&self) -> LedgerResult<i64> {
        let projects = self.list_projects(&ProjectListQuery::default())?;
        Ok(next_invoice_number(
            &projects,
            self.config.initial_invoice_number,
        ))
    }

    pub fn revenue_summary(&self, range: TimeRange, today: NaiveDate) -> LedgerResult<RevenueSummary> {
        let projects = self.list_projects(&ProjectListQuery::default())?;
        let paid: Vec<Project> = projects.iter().filter(|p| p.paid).cloned().collect();

        Ok(RevenueSummary {
            booked_total: projects_fee_total(&projects),
            paid_total: projects_fee_total(&paid),
            by_media_type: media_type_totals(&projects),
            by_period: income_by_period(&projects, range, today),
        })
    }

    fn check_project(&self, project: &Project) -> LedgerResult<()> {
        validate_project(project, &self.config.project_rules)?;
        project.items.iter().try_for_each(|item| item.validate())
    }
}

/// Maps a repository failure onto the user-facing taxonomy and logs it.
pub(crate) fn storage_failure(event: &str, err: RepoError) -> LedgerError {
    match err {
        RepoError::NotFound { entity, id } => {
            warn!("event={event} module=service status=not_found entity={entity} id={id}");
            LedgerError::UnexpectedNilValue(entity.to_string())
        }
        other => {
            error!("event={event} module=service status=error error={other}");
            LedgerError::DataCorruption
        }
    }
}
