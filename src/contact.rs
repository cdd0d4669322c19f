/// Contact validation for the confirmation step
///
/// Validation always works on the digit-stripped phone number; display masks
/// live in `mask` and never feed back into these checks.
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::error::ContactError;

/// Thai mobile numbers are ten digits
pub const PHONE_DIGITS: usize = 10;

fn mobile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^0[689]\d{8}$").expect("mobile pattern is valid"))
}

/// Strip everything but ASCII digits
pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Digits of a phone input, truncated to ten as the field does while typing
pub fn normalize_phone(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(PHONE_DIGITS)
        .collect()
}

pub fn validate_phone(input: &str) -> Result<String, ContactError> {
    let phone = normalize_phone(input);
    if mobile_pattern().is_match(&phone) {
        Ok(phone)
    } else {
        Err(ContactError::InvalidPhone)
    }
}

pub fn validate_name(input: &str) -> Result<String, ContactError> {
    let name = input.trim();
    if name.is_empty() {
        Err(ContactError::EmptyName)
    } else {
        Ok(name.to_string())
    }
}

/// Field status as the form shows it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldState {
    /// Not yet edited; never shows an error
    Untouched,
    Valid,
    Invalid(ContactError),
}

impl FieldState {
    fn from_result<T>(touched: bool, result: Result<T, ContactError>) -> Self {
        match (touched, result) {
            (false, _) => FieldState::Untouched,
            (true, Ok(_)) => FieldState::Valid,
            (true, Err(err)) => FieldState::Invalid(err),
        }
    }

    /// Error to render next to the field, if any
    pub fn error(&self) -> Option<ContactError> {
        match self {
            FieldState::Invalid(err) => Some(*err),
            _ => None,
        }
    }
}

/// Customer name and phone as typed on the confirmation step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    name: String,
    phone: String,
    name_touched: bool,
    phone_touched: bool,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, value: &str) {
        self.name = value.to_string();
        self.name_touched = true;
    }

    /// Store the digits of `value`, truncated to ten
    pub fn set_phone(&mut self, value: &str) {
        self.phone = normalize_phone(value);
        self.phone_touched = true;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Digit-only phone
    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn name_state(&self) -> FieldState {
        FieldState::from_result(self.name_touched, validate_name(&self.name))
    }

    /// An empty phone that was touched and cleared stays neutral until the
    /// user types again
    pub fn phone_state(&self) -> FieldState {
        if self.phone_touched && self.phone.is_empty() {
            return FieldState::Untouched;
        }
        FieldState::from_result(self.phone_touched, validate_phone(&self.phone))
    }

    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    /// Validated (name, phone), or every failing field
    pub fn validate(&self) -> Result<(String, String), Vec<ContactError>> {
        match (validate_name(&self.name), validate_phone(&self.phone)) {
            (Ok(name), Ok(phone)) => Ok((name, phone)),
            (name, phone) => Err([name.err(), phone.err()].into_iter().flatten().collect()),
        }
    }
}
