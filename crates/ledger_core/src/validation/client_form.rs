//! Field validators for the client and item forms.
//!
//! Email and phone are optional: blank input always passes.

use crate::validation::result::ValidationResult;
use crate::validation::rules::{is_not_empty, is_valid_email, is_valid_fee, is_valid_phone_number};

/// Logical field ids of the client form that carry rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClientField {
    Name,
    Email,
    Phone,
}

impl ClientField {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
        }
    }
}

/// Identity rule: a person name or a company must be present.
pub fn validate_client_identity(first_name: &str, last_name: &str, company: &str) -> ValidationResult {
    if is_not_empty(first_name) || is_not_empty(last_name) || is_not_empty(company) {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid("Name or Company is required")
    }
}

pub fn validate_email(email: &str) -> ValidationResult {
    if !is_not_empty(email) || is_valid_email(email) {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid("Invalid email format")
    }
}

pub fn validate_phone(phone: &str) -> ValidationResult {
    if !is_not_empty(phone) || is_valid_phone_number(phone) {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid("Invalid phone number format")
    }
}

/// Item names are required by the item form only.
pub fn validate_item_name(name: &str) -> ValidationResult {
    if is_not_empty(name) {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid("Item name is required")
    }
}

pub fn validate_fee(fee: f64) -> ValidationResult {
    if is_valid_fee(fee) {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid("Fee must be zero or a positive amount")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_accepts_any_of_three_names() {
        assert!(!validate_client_identity("", "", "").is_valid);
        assert!(!validate_client_identity(" ", "\n", "\t").is_valid);
        assert!(validate_client_identity("", "", "ABC").is_valid);
        assert!(validate_client_identity("Jane", "", "").is_valid);
    }

    #[test]
    fn optional_contact_fields() {
        assert!(validate_email("").is_valid);
        assert!(validate_phone("   ").is_valid);
        assert_eq!(validate_email("nope").error(), Some("Invalid email format"));
        assert_eq!(
            validate_phone("555-1234").error(),
            Some("Invalid phone number format")
        );
        assert!(validate_phone("(555) 555-1234").is_valid);
    }

    #[test]
    fn item_rules() {
        assert_eq!(validate_item_name(" ").error(), Some("Item name is required"));
        assert!(validate_fee(0.0).is_valid);
        assert!(!validate_fee(-5.0).is_valid);
    }
}
