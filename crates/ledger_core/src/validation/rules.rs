//! Stateless validation primitives.
//!
//! # Invariants
//! - Every function is total: no panics, no errors, only `bool`.
//! - Email shape follows `^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$`.
//! - Phone validity only counts ASCII digits; formatting characters are ignored.

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Longest allowed project span, inclusive.
pub const MAX_PROJECT_SPAN_DAYS: i64 = 730;
/// Minimum digit count for a phone number.
pub const MIN_PHONE_DIGITS: usize = 10;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

/// True when `value` has visible content after trimming whitespace/newlines.
pub fn is_not_empty(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_phone_number(value: &str) -> bool {
    digit_count(value) >= MIN_PHONE_DIGITS
}

/// Number of ASCII decimal digits in `value`.
pub fn digit_count(value: &str) -> usize {
    value.chars().filter(char::is_ascii_digit).count()
}

/// Strict ordering: equal instants are not a valid range.
pub fn is_valid_date_range(start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    end > start
}

/// Span of at most `MAX_PROJECT_SPAN_DAYS`, boundary included.
pub fn is_reasonable_date_range(start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    end - start <= Duration::days(MAX_PROJECT_SPAN_DAYS)
}

/// Finite and non-negative.
pub fn is_valid_fee(fee: f64) -> bool {
    fee.is_finite() && fee >= 0.0
}
