//! Login forms and their wire payloads.

use serde::Serialize;

use adala_core::validation::{
    is_account_number, is_password_long_enough, is_two_factor_code, is_valid_email,
};
use adala_core::FieldErrors;

/// Credentials entered on the login screen.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub tenant_account_number: String,
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

impl core::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginForm")
            .field("tenant_account_number", &self.tenant_account_number)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("remember_me", &self.remember_me)
            .finish()
    }
}

impl LoginForm {
    pub fn new(
        tenant_account_number: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            tenant_account_number: tenant_account_number.into(),
            email: email.into(),
            password: password.into(),
            remember_me: false,
        }
    }

    pub fn remember_me(mut self, remember: bool) -> Self {
        self.remember_me = remember;
        self
    }

    /// Field-level validation, one entry per invalid field.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        let account = self.tenant_account_number.trim();
        if account.is_empty() {
            errors.push("tenant_account_number", "required");
        } else if !is_account_number(account) {
            errors.push("tenant_account_number", "must be exactly 6 digits");
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push("email", "required");
        } else if !is_valid_email(email) {
            errors.push("email", "invalid email address");
        }

        if self.password.is_empty() {
            errors.push("password", "required");
        } else if !is_password_long_enough(&self.password) {
            errors.push("password", "must be at least 8 characters");
        }
        errors.into_result()
    }

    /// Wire body for `POST /auth/login`.
    pub fn to_request(&self) -> LoginRequest<'_> {
        LoginRequest {
            tenant_account_number: self.tenant_account_number.trim(),
            email: self.email.trim(),
            password: &self.password,
            remember_me: self.remember_me,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub tenant_account_number: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub remember_me: bool,
}

/// The second login step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TwoFactorForm {
    pub code: String,
}

impl TwoFactorForm {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        let code = self.code.trim();
        if code.is_empty() {
            errors.push("code", "required");
        } else if !is_two_factor_code(code) {
            errors.push("code", "must be exactly 6 digits");
        }
        errors.into_result()
    }
}

/// Wire body for `POST /auth/verify-2fa`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorRequest<'a> {
    pub code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_factor_token: Option<&'a str>,
}
