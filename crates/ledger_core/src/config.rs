//! Explicit user/company configuration.
//!
//! # Responsibility
//! - Hold the profile, company and banking details printed on invoices.
//! - Carry numbering and save-policy settings into services.
//!
//! # Invariants
//! - Passed by reference into the services that need it; there is no
//!   process-wide settings singleton.
//! - JSON keys are camelCase; missing keys take their defaults.

use crate::error::{LedgerError, LedgerResult};
use crate::validation::ProjectRules;
use serde::{Deserialize, Serialize};

/// Sender company block on invoices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
    pub name: String,
    pub contact: String,
    pub address: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    pub email: String,
}

impl Company {
    pub fn city_state_zip(&self) -> String {
        format!("{}, {} {}", self.city, self.state, self.zip)
    }
}

/// Payment details printed at the bottom of invoices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankingInfo {
    pub bank: String,
    pub routing_number: String,
    pub account_number: String,
    pub account_name: String,
    pub zelle: String,
    pub venmo: String,
}

/// Musician profile. Also embedded verbatim in JSON backups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserData {
    pub user_first_name: String,
    pub user_last_name: String,
    pub company: Company,
    pub banking_info: BankingInfo,
    pub add_to_calendar: bool,
}

impl UserData {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.user_first_name.trim(), self.user_last_name.trim())
            .trim()
            .to_string()
    }
}

/// Root configuration handed to services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LedgerConfig {
    pub user_data: UserData,
    /// Fallback for `next_invoice_number` when no project has an invoice.
    pub initial_invoice_number: i64,
    /// Version tag written into backups.
    pub app_version: String,
    pub project_rules: ProjectRules,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            user_data: UserData::default(),
            initial_invoice_number: 0,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            project_rules: ProjectRules::default(),
        }
    }
}

impl LedgerConfig {
    /// Decodes settings saved by `to_json_string`.
    ///
    /// # Errors
    /// - Returns `InvalidConfiguration` when `raw` is not a JSON object of the
    ///   expected shape.
    pub fn from_json_str(raw: &str) -> LedgerResult<Self> {
        serde_json::from_str(raw).map_err(|err| LedgerError::InvalidConfiguration(err.to_string()))
    }

    pub fn to_json_string(&self) -> LedgerResult<String> {
        serde_json::to_string(self).map_err(|err| LedgerError::InvalidConfiguration(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{LedgerConfig, UserData};
    use crate::error::LedgerError;

    #[test]
    fn missing_keys_take_defaults() {
        let config = LedgerConfig::from_json_str(r#"{"initialInvoiceNumber": 1000}"#).unwrap();
        assert_eq!(config.initial_invoice_number, 1000);
        assert_eq!(config.user_data, UserData::default());
        assert!(config.project_rules.artist_required);
        assert!(!config.app_version.is_empty());
    }

    #[test]
    fn round_trips_through_json() {
        let mut config = LedgerConfig::default();
        config.user_data.user_first_name = "Gabe".to_string();
        config.user_data.company.city = "Nashville".to_string();
        config.user_data.banking_info.venmo = "@gabe".to_string();
        config.project_rules.artist_required = false;

        let raw = config.to_json_string().unwrap();
        assert!(raw.contains("\"userFirstName\":\"Gabe\""));
        assert!(raw.contains("\"artistRequired\":false"));
        assert_eq!(LedgerConfig::from_json_str(&raw).unwrap(), config);
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = LedgerConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, LedgerError::InvalidConfiguration(_)));
    }

    #[test]
    fn company_and_user_display_helpers() {
        let mut user = UserData::default();
        user.user_last_name = "Witcher".to_string();
        user.company.city = "Austin".to_string();
        user.company.state = "TX".to_string();
        user.company.zip = "78701".to_string();
        assert_eq!(user.full_name(), "Witcher");
        assert_eq!(user.company.city_state_zip(), "Austin, TX 78701");
    }
}
