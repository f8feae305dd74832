//! Form validation.
//!
//! Every submission is checked in one synchronous pass that produces a
//! [`ValidationReport`] before anything touches the network. The first error
//! in the report is the message shown to the user.

use std::collections::HashMap;

use crate::identity::Credentials;

pub const ALL_FIELDS_REQUIRED: &str = "All fields are required!";
pub const INVALID_EMAIL: &str = "Please enter a valid email address!";
pub const PASSWORDS_MISMATCH: &str = "Passwords do not match!";
pub const PASSWORD_TOO_SHORT: &str = "Password length must be at least 6 characters!";

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Submitted form fields by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData(HashMap<String, String>);

impl FormData {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self(fields)
    }

    /// The trimmed value of `name`, or `None` when the field is missing or blank.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// The value of `name` exactly as submitted, for fields such as passwords
    /// where surrounding whitespace is significant.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Outcome of one validation pass.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Record every blank field in `fields` under one shared message.
    /// Returns `true` when all of them are present.
    pub fn require(&mut self, form: &FormData, fields: &[&str]) -> bool {
        let mut complete = true;
        for field in fields {
            if form.value(field).is_none() {
                self.push(*field, ALL_FIELDS_REQUIRED);
                complete = false;
            }
        }
        complete
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_error_for(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        match self.errors.first() {
            None => Ok(()),
            Some(first) => Err(ValidationError {
                message: first.message.clone(),
                errors: self.errors,
            }),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub errors: Vec<FieldError>,
}

/// Parse a strictly positive number, pushing `not_number` or `not_positive` on failure.
pub fn positive_number(
    report: &mut ValidationReport,
    field: &str,
    raw: &str,
    not_number: &str,
    not_positive: &str,
) -> Option<f64> {
    match raw.parse::<f64>() {
        Ok(n) if !n.is_finite() => {
            report.push(field, not_number);
            None
        }
        Ok(n) if n <= 0.0 => {
            report.push(field, not_positive);
            None
        }
        Ok(n) => Some(n),
        Err(_) => {
            report.push(field, not_number);
            None
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    value.contains('@')
}

/// Validate a sign-up form: presence, email shape, matching confirmation, minimum length.
pub fn validate_sign_up(form: &FormData, confirm_field: &str) -> Result<Credentials, ValidationError> {
    let mut report = ValidationReport::new();

    if report.require(form, &["email", "password", confirm_field]) {
        let email = form.value("email").unwrap_or_default();
        let password = form.raw("password").unwrap_or_default();
        let confirmation = form.raw(confirm_field).unwrap_or_default();

        if !looks_like_email(email) {
            report.push("email", INVALID_EMAIL);
        }
        if password != confirmation {
            report.push(confirm_field, PASSWORDS_MISMATCH);
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            report.push("password", PASSWORD_TOO_SHORT);
        }
    }

    report.into_result()?;
    Ok(credentials(form))
}

/// Validate a sign-in form: presence and email shape.
pub fn validate_sign_in(form: &FormData) -> Result<Credentials, ValidationError> {
    let mut report = ValidationReport::new();

    if report.require(form, &["email", "password"]) && !looks_like_email(form.value("email").unwrap_or_default()) {
        report.push("email", INVALID_EMAIL);
    }

    report.into_result()?;
    Ok(credentials(form))
}

fn credentials(form: &FormData) -> Credentials {
    Credentials::new(
        form.value("email").unwrap_or_default(),
        form.raw("password").unwrap_or_default(),
    )
}
