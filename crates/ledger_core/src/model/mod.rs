//! Domain records for the gig ledger.
//!
//! # Responsibility
//! - Define the plain records consumed and produced by validators, calculators
//!   and export.
//! - Keep enum labels identical to what the UI and exported files show.
//!
//! # Invariants
//! - Projects and clients are identified by stable UUIDs.
//! - Items and invoices are owned by exactly one project.
//! - A project references at most one client by id; clients never own projects.

pub mod client;
pub mod invoice;
pub mod item;
pub mod project;

pub use client::{Client, ClientId};
pub use invoice::Invoice;
pub use item::{Item, ItemType};
pub use project::{MediaType, Project, ProjectId, ProjectStatus};
