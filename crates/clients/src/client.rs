use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_core::validation::{is_valid_email, require_text};
use adala_core::{FieldErrors, Labeled, RecordId, Resource};

adala_core::labeled_status! {
    pub enum ClientStatus {
        Active => ("active", "نشط"),
        Inactive => ("inactive", "غير نشط"),
    }
}

adala_core::labeled_status! {
    /// Legal form of a client.
    pub enum ClientType {
        Individual => ("individual", "فرد"),
        Company => ("company", "شركة"),
        Government => ("government", "جهة حكومية"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: RecordId,
    pub name: String,
    #[serde(default = "default_client_type")]
    pub client_type: ClientType,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub commercial_register: Option<String>,
    #[serde(default)]
    pub tax_number: Option<String>,
    #[serde(default = "default_status")]
    pub status: ClientStatus,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub portal_access: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_client_type() -> ClientType {
    ClientType::Individual
}

fn default_status() -> ClientStatus {
    ClientStatus::Active
}

impl Resource for Client {
    const PATH: &'static str = "/clients";
    const COLLECTION_KEY: &'static str = "clients";
    const LABEL: &'static str = "العميل";
    const PLURAL_LABEL: &'static str = "العملاء";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn status_label(&self) -> Option<&str> {
        Some(self.status.label())
    }
}

/// Body of `POST /clients` and `PUT /clients/:id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientPayload {
    pub name: String,
    pub client_type: ClientType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commercial_register: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub status: ClientStatus,
}

impl ClientPayload {
    pub fn new(name: impl Into<String>, client_type: ClientType) -> Self {
        Self {
            name: name.into(),
            client_type,
            email: None,
            phone: None,
            national_id: None,
            commercial_register: None,
            address: None,
            status: ClientStatus::Active,
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "name", &self.name);
        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            if !is_valid_email(email) {
                errors.push("email", "invalid email address");
            }
        }
        if self.client_type == ClientType::Company
            && self.commercial_register.as_deref().is_none_or(|r| r.trim().is_empty())
        {
            errors.push("commercial_register", "required for companies");
        }
        if self.client_type == ClientType::Unknown {
            errors.push("client_type", "unknown client type");
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_backend_row_with_defaults() {
        let client: Client = serde_json::from_value(json!({
            "id": "3f0c5b8e-2f6a-4c1e-9a57-0d1c2b3a4f5e",
            "name": "مؤسسة الفجر",
            "tags": ["vip"]
        }))
        .unwrap();
        assert_eq!(client.client_type, ClientType::Individual);
        assert_eq!(client.status_label(), Some("نشط"));
        assert_eq!(client.display_name(), "مؤسسة الفجر");
    }

    #[test]
    fn companies_need_a_commercial_register() {
        let mut payload = ClientPayload::new("شركة الرمال", ClientType::Company);
        assert!(payload.validate().unwrap_err().contains("commercial_register"));
        payload.commercial_register = Some("1010101010".into());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn optional_email_is_checked_when_present() {
        let mut payload = ClientPayload::new("سارة", ClientType::Individual);
        payload.email = Some("sara@".into());
        assert!(payload.validate().unwrap_err().contains("email"));
        payload.email = Some(String::new());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn payload_omits_empty_optionals() {
        let body = serde_json::to_value(ClientPayload::new("x", ClientType::Government)).unwrap();
        assert_eq!(body, json!({ "name": "x", "client_type": "government", "status": "active" }));
    }
}
