use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_auth::Role;
use adala_core::validation::{is_password_long_enough, is_valid_email, require_text};
use adala_core::{FieldErrors, Labeled, RecordId, Resource};

use crate::role::RoleSummary;

adala_core::labeled_status! {
    pub enum UserStatus {
        Active => ("active", "نشط"),
        Inactive => ("inactive", "غير نشط"),
        Suspended => ("suspended", "معلق"),
        Pending => ("pending", "قيد الانتظار"),
    }
}

fn default_status() -> UserStatus {
    UserStatus::Active
}

fn default_role() -> Role {
    Role::USER
}

/// A user account of the current tenant (`/users`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: RecordId,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default = "default_role")]
    pub role: Role,
    /// RBAC roles assigned on top of the built-in `role`.
    #[serde(default)]
    pub roles: Vec<RoleSummary>,
    #[serde(default = "default_status")]
    pub status: UserStatus,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserAccount {
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn role_label(&self) -> &str {
        self.role.label()
    }
}

impl Resource for UserAccount {
    const PATH: &'static str = "/users";
    const COLLECTION_KEY: &'static str = "users";
    const LABEL: &'static str = "المستخدم";
    const PLURAL_LABEL: &'static str = "المستخدمين";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_name(&self) -> String {
        let name = self.full_name();
        if name.is_empty() { self.email.clone() } else { name }
    }

    fn status_label(&self) -> Option<&str> {
        Some(self.status.label())
    }
}

/// Body of `POST /users` and `PUT /users/:id`.
///
/// `password` is only sent on creation.
#[derive(Clone, PartialEq, Serialize)]
pub struct UserPayload {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

impl core::fmt::Debug for UserPayload {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UserPayload")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("role", &self.role)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl UserPayload {
    /// `creating` requires a password; updates must not carry one.
    pub fn validate(&self, creating: bool) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if !is_valid_email(self.email.trim()) {
            errors.push("email", "invalid email address");
        }
        require_text(&mut errors, "first_name", &self.first_name);
        require_text(&mut errors, "last_name", &self.last_name);
        match (&self.password, creating) {
            (None, true) => errors.push("password", "required"),
            (Some(p), true) if !is_password_long_enough(p) => {
                errors.push("password", "must be at least 8 characters")
            }
            (Some(_), false) => errors.push("password", "use the password endpoint"),
            _ => {}
        }
        errors.into_result()
    }
}

/// Body of `PUT /users/:id/password`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct PasswordChange {
    pub password: String,
}

impl core::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordChange(<redacted>)")
    }
}

impl PasswordChange {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if !is_password_long_enough(&self.password) {
            errors.push("password", "must be at least 8 characters");
        }
        errors.into_result()
    }
}
