//! Local field validation applied before any network call.
//!
//! The rules mirror the form validators of the web client: a tenant account
//! number is exactly six digits, emails follow the usual `local@domain`
//! shape, passwords have at least eight characters and two-factor codes are
//! six digits.

use serde::Serialize;

/// Length of a tenant account number and of a two-factor code.
pub const ACCOUNT_NUMBER_LEN: usize = 6;
pub const TWO_FACTOR_CODE_LEN: usize = 6;
pub const PASSWORD_MIN_LEN: usize = 8;

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;
const MAX_DOMAIN_LABEL_LEN: usize = 63;

/// A single invalid field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Accumulated field errors for one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl core::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for e in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
            first = false;
        }
        Ok(())
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

/// Tenant account numbers are exactly six ASCII digits.
pub fn is_account_number(value: &str) -> bool {
    is_digits(value, ACCOUNT_NUMBER_LEN)
}

/// Two-factor codes are exactly six ASCII digits.
pub fn is_two_factor_code(value: &str) -> bool {
    is_digits(value, TWO_FACTOR_CODE_LEN)
}

/// Password length is counted in characters, not bytes.
pub fn is_password_long_enough(value: &str) -> bool {
    value.chars().count() >= PASSWORD_MIN_LEN
}

fn is_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~-".contains(c)
}

fn is_domain_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_DOMAIN_LABEL_LEN
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !label.starts_with('-')
        && !label.ends_with('-')
}

/// Structural email check (same acceptance as the web form validator).
///
/// A top-level domain is not required: `user@localhost` is accepted.
pub fn is_valid_email(value: &str) -> bool {
    if value.is_empty() || value.len() > MAX_EMAIL_LEN {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > MAX_LOCAL_PART_LEN || domain.contains('@') {
        return false;
    }
    let local_ok = local
        .split('.')
        .all(|atom| !atom.is_empty() && atom.chars().all(is_local_char));
    local_ok && domain.split('.').all(is_domain_label)
}

/// Required-text check used by the record payloads.
pub fn require_text(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(field, "required");
    }
}
