use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_core::validation::{is_account_number, is_valid_email, require_text};
use adala_core::{FieldErrors, Labeled, RecordId, Resource};

adala_core::labeled_status! {
    pub enum TenantStatus {
        Active => ("active", "نشط"),
        Suspended => ("suspended", "معلق"),
        Trial => ("trial", "تجريبي"),
    }
}

/// A law firm account (`/tenants`, super admin only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: RecordId,
    #[serde(default)]
    pub account_number: Option<String>,
    pub name: String,
    #[serde(default)]
    pub subdomain: Option<String>,
    pub status: TenantStatus,
    #[serde(default)]
    pub subscription_plan: Option<String>,
    #[serde(default)]
    pub subscription_end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Resource for Tenant {
    const PATH: &'static str = "/tenants";
    const COLLECTION_KEY: &'static str = "tenants";
    const LABEL: &'static str = "المستأجر";
    const PLURAL_LABEL: &'static str = "المستأجرين";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_name(&self) -> String {
        match self.account_number.as_deref() {
            Some(number) => format!("{} ({number})", self.name),
            None => self.name.clone(),
        }
    }

    fn status_label(&self) -> Option<&str> {
        Some(self.status.label())
    }
}

fn is_subdomain(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 63
        && value
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        && !value.starts_with('-')
        && !value.ends_with('-')
}

/// Body of `POST /tenants` and `PUT /tenants/:id`.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct TenantPayload {
    pub name: String,
    pub subdomain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TenantStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
}

impl core::fmt::Debug for TenantPayload {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TenantPayload")
            .field("name", &self.name)
            .field("subdomain", &self.subdomain)
            .field("account_number", &self.account_number)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl TenantPayload {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "name", &self.name);
        if !is_subdomain(&self.subdomain) {
            errors.push("subdomain", "lowercase letters, digits and dashes only");
        }
        if self.account_number.as_deref().is_some_and(|n| !is_account_number(n)) {
            errors.push("account_number", "must be exactly 6 digits");
        }
        for (field, email) in [
            ("contact_email", &self.contact_email),
            ("admin_email", &self.admin_email),
        ] {
            if email.as_deref().is_some_and(|e| !is_valid_email(e)) {
                errors.push(field, "invalid email address");
            }
        }
        errors.into_result()
    }
}
