//! Validation rules for projects, clients and items.
//!
//! # Responsibility
//! - Provide pure predicate primitives (`rules`).
//! - Combine them into field validators returning `ValidationResult` and
//!   entity validators returning `LedgerError`.
//! - Track per-form validation UI state (`form_state`).
//!
//! # Invariants
//! - Primitives and field validators are total and side-effect free.
//! - Only `Validatable::validate` reports failures as `LedgerError`.

pub mod client_form;
pub mod entity;
pub mod form_state;
pub mod phone;
pub mod project_form;
pub mod result;
pub mod rules;

pub use entity::{validate_project, ProjectRules, Validatable};
pub use form_state::{FieldValue, FormAction, FormValidationState, SummaryError};
pub use project_form::{ProjectField, ProjectFormValues};
pub use result::ValidationResult;
