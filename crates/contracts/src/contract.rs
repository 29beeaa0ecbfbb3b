use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_core::money::opt_money;
use adala_core::validation::require_text;
use adala_core::{FieldErrors, Labeled, Money, RecordId, Resource};

/// Currency used when a contract does not name one.
pub const DEFAULT_CURRENCY: &str = "SAR";

adala_core::labeled_status! {
    pub enum ContractStatus {
        Draft => ("draft", "مسودة"),
        Active => ("active", "ساري"),
        Expired => ("expired", "منتهي"),
        Terminated => ("terminated", "مفسوخ"),
    }
}

fn default_status() -> ContractStatus {
    ContractStatus::Draft
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn first_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub contract_number: Option<String>,
    #[serde(default)]
    pub contract_type: Option<String>,
    #[serde(default)]
    pub client_id: Option<RecordId>,
    #[serde(default = "default_status")]
    pub status: ContractStatus,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "opt_money")]
    pub value: Option<Money>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "first_version")]
    pub version: u32,
    #[serde(default)]
    pub is_signed: bool,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Contract {
    /// Active contracts whose end date has passed at `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == ContractStatus::Active && self.end_date.is_some_and(|end| end < now)
    }
}

impl Resource for Contract {
    const PATH: &'static str = "/contracts";
    const COLLECTION_KEY: &'static str = "contracts";
    const LABEL: &'static str = "العقد";
    const PLURAL_LABEL: &'static str = "العقود";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_name(&self) -> String {
        self.title.clone()
    }

    fn status_label(&self) -> Option<&str> {
        Some(self.status.label())
    }
}

/// Body of `POST /contracts` and `PUT /contracts/:id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractPayload {
    pub title: String,
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    pub status: ContractStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Money>,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ContractPayload {
    pub fn new(title: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            client_id: client_id.into(),
            contract_type: None,
            status: ContractStatus::Draft,
            start_date: None,
            end_date: None,
            value: None,
            currency: DEFAULT_CURRENCY.to_string(),
            template_id: None,
            content: None,
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "title", &self.title);
        require_text(&mut errors, "client_id", &self.client_id);
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                errors.push("end_date", "must not precede the start date");
            }
        }
        if self.value.is_some_and(|v| v.is_negative()) {
            errors.push("value", "must be a non-negative amount");
        }
        if self.currency.len() != 3 || !self.currency.bytes().all(|b| b.is_ascii_uppercase()) {
            errors.push("currency", "must be a three-letter code");
        }
        errors.into_result()
    }
}

/// One entry of `/contracts/:id/versions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractVersion {
    pub id: RecordId,
    pub version_number: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub change_summary: Option<String>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn decodes_decimal_value_from_string() {
        let contract: Contract = serde_json::from_value(json!({
            "id": "c7",
            "title": "عقد توريد",
            "status": "active",
            "value": "25000.00",
            "end_date": "2024-01-31T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(contract.value, Some(Money::from_minor(2_500_000)));
        assert_eq!(contract.currency, "SAR");
        assert_eq!(contract.version, 1);
        assert_eq!(contract.status_label(), Some("ساري"));

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert!(contract.is_overdue(now));
    }

    #[test]
    fn payload_checks_dates_amount_and_currency() {
        let mut payload = ContractPayload::new("عقد عمل", "cl-1");
        assert!(payload.validate().is_ok());

        payload.start_date = Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
        payload.end_date = Some(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap());
        payload.value = Some(Money::from_minor(-100));
        payload.currency = "sar".into();
        let errors = payload.validate().unwrap_err();
        assert!(errors.contains("end_date"));
        assert!(errors.contains("value"));
        assert!(errors.contains("currency"));
    }
}
