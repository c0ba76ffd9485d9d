//! US phone number formatting helpers for the client form.
//!
//! Formatting is advisory: inputs the formatter does not understand are
//! returned unchanged, and validity is decided by digit count only.

/// Strips everything but ASCII digits.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Formats a phone number while the user types.
///
/// - 1-3 digits: `123`
/// - 4-6 digits: `123-456`
/// - 7 digits: `123-4567`
/// - 8-10 digits: `(123) 456-7890`
/// - 11 digits starting with `1`: `+1 (123) 456-7890`
///
/// Empty input and more than 11 digits are returned unchanged.
pub fn format_as_typing(input: &str) -> String {
    let digits = digits_only(input);
    if digits.is_empty() || digits.len() > 11 {
        return input.to_string();
    }

    match digits.len() {
        1..=3 => digits,
        4..=6 => format!("{}-{}", &digits[..3], &digits[3..]),
        7 => format!("{}-{}{}", &digits[..3], &digits[3..6], &digits[6..]),
        8..=10 => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
        _ if digits.starts_with('1') => {
            format!("+1 ({}) {}-{}", &digits[1..4], &digits[4..7], &digits[7..])
        }
        _ => digits,
    }
}

/// Formats a complete number when it has 10-11 digits, else returns it as is.
pub fn validate_and_format(phone: &str) -> String {
    let digits = digits_only(phone);
    if (10..=11).contains(&digits.len()) {
        format_as_typing(&digits)
    } else {
        phone.to_string()
    }
}

/// Stricter check used for display hints: 10-11 digits.
pub fn is_valid_us_phone(phone: &str) -> bool {
    !phone.is_empty() && (10..=11).contains(&digits_only(phone).len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_progressively() {
        assert_eq!(format_as_typing("12"), "12");
        assert_eq!(format_as_typing("1234"), "123-4");
        assert_eq!(format_as_typing("1234567"), "123-4567");
        assert_eq!(format_as_typing("5551234567"), "(555) 123-4567");
        assert_eq!(format_as_typing("15551234567"), "+1 (555) 123-4567");
        assert_eq!(format_as_typing("25551234567"), "25551234567");
    }

    #[test]
    fn leaves_unknown_input_alone() {
        assert_eq!(format_as_typing(""), "");
        assert_eq!(format_as_typing("abc"), "abc");
        assert_eq!(format_as_typing("123456789012"), "123456789012");
    }

    #[test]
    fn validate_and_format_requires_full_number() {
        assert_eq!(validate_and_format("555.123.4567"), "(555) 123-4567");
        assert_eq!(validate_and_format("555-1234"), "555-1234");
        assert!(is_valid_us_phone("+1 555 123 4567"));
        assert!(!is_valid_us_phone("555 1234"));
    }
}
