//! Local checks run before a staff form reaches the server
//!
//! Phase one only looks for blank required fields. Format rules run only when
//! every required field is present, and only on non-blank values.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use validator::{Validate, ValidationError};

use super::fields::{field_label, StaffForm, REQUIRED_FIELDS};

pub const REQUIRED_MESSAGE: &str = "Este campo es obligatorio";
pub const WEAK_PASSWORD_WARNING: &str =
    "La contraseña es débil. Considere usar mayúsculas, números y símbolos.";

static CI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{6,15}$").expect("static pattern"));
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-zÁ-úÑñ\s]{2,50}$").expect("static pattern"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static pattern"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{7,15}$").expect("static pattern"));
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]{4,30}$").expect("static pattern"));
static WEAK_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(123456|password|admin|qwerty)").expect("static pattern"));

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn check(value: &str, re: &Regex, code: &'static str, message: &'static str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || re.is_match(value) {
        Ok(())
    } else {
        Err(invalid(code, message))
    }
}

pub fn validate_ci(value: &str) -> Result<(), ValidationError> {
    check(value, &CI_RE, "ci", "CI debe tener entre 6 y 15 dígitos")
}

pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    check(value, &NAME_RE, "name", "Solo letras y espacios, mínimo 2 caracteres")
}

pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    check(value, &EMAIL_RE, "email", "Formato de email inválido")
}

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    check(value, &PHONE_RE, "phone", "Teléfono debe tener entre 7 y 15 dígitos")
}

pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    check(
        value,
        &USERNAME_RE,
        "username",
        "Solo letras, números y guiones bajos (4-30 caracteres)",
    )
}

pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    if value.chars().count() < 8 {
        return Err(invalid("password_length", "Mínimo 8 caracteres"));
    }
    if !value.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(invalid("password_letter", "Debe contener al menos una letra"));
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(invalid("password_digit", "Debe contener al menos un número"));
    }
    Ok(())
}

/// Acceptable but easy to guess
pub fn is_weak_password(password: &str) -> bool {
    WEAK_PREFIX_RE.is_match(password)
        || password.chars().count() < 8
        || !password.chars().any(|c| c.is_ascii_uppercase())
        || !password.chars().any(|c| c.is_ascii_digit())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPhase {
    Required,
    Format,
}

/// Result of the local checks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormReport {
    /// Field name → message shown under the input
    pub errors: BTreeMap<String, String>,
    pub warnings: Vec<String>,
    pub phase: Option<ValidationPhase>,
}

impl FormReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn invalid_fields(&self) -> Vec<&str> {
        self.errors.keys().map(String::as_str).collect()
    }

    /// Labels of the invalid fields, for the summary dialog
    pub fn labels(&self) -> Vec<&'static str> {
        self.errors.keys().map(|f| field_label(f)).collect()
    }
}

impl StaffForm {
    pub fn check(&self) -> FormReport {
        let mut report = FormReport::default();

        for field in REQUIRED_FIELDS {
            let blank = self.value(field).map_or(true, |v| v.trim().is_empty());
            if blank {
                report.errors.insert(field.to_string(), REQUIRED_MESSAGE.to_string());
            }
        }
        if !report.is_valid() {
            report.phase = Some(ValidationPhase::Required);
            return report;
        }

        if let Err(errors) = self.validate() {
            for (field, errs) in errors.field_errors() {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Formato inválido".to_string());
                report.errors.insert(field.to_string(), message);
            }
            report.phase = Some(ValidationPhase::Format);
        }

        if report.is_valid() && is_weak_password(&self.password) {
            report.warnings.push(WEAK_PASSWORD_WARNING.to_string());
        }
        report
    }
}
