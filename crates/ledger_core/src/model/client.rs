//! Client (payer) record.
//!
//! # Invariants
//! - At least one of `first_name`, `last_name`, `company` is non-blank; enforced
//!   by `Validatable for Client`, not by construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ClientId = Uuid;

const UNNAMED_CONTACT: &str = "Unnamed Contact";

/// Person or company billed for projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub attention: String,
    pub address: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub notes: String,
    pub company: String,
}

impl Client {
    /// Creates an empty client with a generated id.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(id: ClientId) -> Self {
        Self {
            id,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            attention: String::new(),
            address: String::new(),
            address2: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            notes: String::new(),
            company: String::new(),
        }
    }

    /// Convenience constructor for a named person.
    pub fn person(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        let mut client = Self::new();
        client.first_name = first_name.into();
        client.last_name = last_name.into();
        client
    }

    /// Convenience constructor for a company-only client.
    pub fn company(company: impl Into<String>) -> Self {
        let mut client = Self::new();
        client.company = company.into();
        client
    }

    /// Name shown on invoices and lists.
    ///
    /// Falls back from "first last" to last, first, company and finally
    /// `Unnamed Contact`.
    pub fn full_name(&self) -> String {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        let company = self.company.trim();

        match (first.is_empty(), last.is_empty()) {
            (false, false) => format!("{first} {last}"),
            (true, false) => last.to_string(),
            (false, true) => first.to_string(),
            (true, true) if !company.is_empty() => company.to_string(),
            (true, true) => UNNAMED_CONTACT.to_string(),
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
