//! FRB-facing API crate for the ledger core.

pub mod api;
