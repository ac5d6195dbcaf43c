//! Field rules for the login form.
//!
//! Everything here is pure: callers decide how a message is rendered.

use std::sync::OnceLock;

use regex::Regex;
use shared::{
    domain::{field_label, FieldId},
    error::FieldError,
    messages,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidation {
    pub valid: bool,
    /// Empty when `valid`.
    pub message: String,
}

impl FieldValidation {
    fn ok() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

impl From<Result<&str, FieldError>> for FieldValidation {
    fn from(value: Result<&str, FieldError>) -> Self {
        match value {
            Ok(_) => FieldValidation::ok(),
            Err(err) => FieldValidation::invalid(err.message),
        }
    }
}

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("field patterns are valid regexes"))
}

fn username_charset() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"^[a-zA-Z가-힣0-9_]+$")
}

fn student_number_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"^[0-9]{4,10}$")
}

fn phone_number_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"^010-[0-9]{4}-[0-9]{4}$")
}

/// Checks one field and returns its trimmed value when it passes.
pub fn check(field: FieldId, raw: &str) -> Result<&str, FieldError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FieldError::new(field, messages::required(field.label())));
    }

    match field {
        FieldId::Username => {
            if !username_charset().is_match(value) {
                return Err(FieldError::new(field, messages::USERNAME_CHARSET));
            }
            if value.chars().count() < 2 {
                return Err(FieldError::new(field, messages::USERNAME_TOO_SHORT));
            }
        }
        FieldId::StudentNumber => {
            if !student_number_pattern().is_match(value) {
                return Err(FieldError::new(field, messages::STUDENT_NUMBER_FORMAT));
            }
        }
        FieldId::PhoneNumber => {
            if !phone_number_pattern().is_match(value) {
                return Err(FieldError::new(field, messages::PHONE_NUMBER_FORMAT));
            }
        }
    }

    Ok(value)
}

pub fn validate(field: FieldId, raw: &str) -> FieldValidation {
    check(field, raw).into()
}

/// Validates by raw id. Ids outside the form only get the required check.
pub fn validate_named(id: &str, raw: &str) -> FieldValidation {
    match id.parse::<FieldId>() {
        Ok(field) => validate(field, raw),
        Err(_) if raw.trim().is_empty() => {
            FieldValidation::invalid(messages::required(field_label(id)))
        }
        Err(_) => FieldValidation::ok(),
    }
}

/// Re-inserts the 3-4-4 hyphens from the digits typed so far.
pub fn format_phone_input(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    match digits.len() {
        0..=2 => digits,
        3..=6 => format!("{}-{}", &digits[..3], &digits[3..]),
        _ => format!("{}-{}-{}", &digits[..3], &digits[3..7], &digits[7..]),
    }
}

#[cfg(test)]
#[path = "tests/validator_tests.rs"]
mod tests;
