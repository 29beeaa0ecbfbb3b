use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_core::validation::require_text;
use adala_core::{FieldErrors, Labeled, RecordId, Resource};

adala_core::labeled_status! {
    /// Procedural stage of a case.
    pub enum CaseStatus {
        New => ("new", "جديدة"),
        UnderReview => ("under_review", "قيد النظر"),
        Pending => ("pending", "معلقة"),
        Postponed => ("postponed", "مؤجلة"),
        Appealed => ("appealed", "مستأنفة"),
        Closed => ("closed", "مغلقة"),
        Finished => ("finished", "منتهية"),
    }
}

impl CaseStatus {
    /// Closed and finished cases accept no new sessions.
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed | Self::Finished)
    }
}

/// A case row as listed under `/cases`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalCase {
    pub id: RecordId,
    #[serde(default)]
    pub case_number: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub client_id: Option<RecordId>,
    /// Client display name, denormalized by the backend for list rows.
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub case_type: Option<String>,
    pub status: CaseStatus,
    #[serde(default)]
    pub court: Option<String>,
    #[serde(default)]
    pub next_session: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for LegalCase {
    const PATH: &'static str = "/cases";
    const COLLECTION_KEY: &'static str = "cases";
    const LABEL: &'static str = "القضية";
    const PLURAL_LABEL: &'static str = "القضايا";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_name(&self) -> String {
        match self.case_number.as_deref().filter(|n| !n.is_empty()) {
            Some(number) => format!("{number} - {}", self.title),
            None => self.title.clone(),
        }
    }

    fn status_label(&self) -> Option<&str> {
        Some(self.status.label())
    }
}

/// Body of `POST /cases` and `PUT /cases/:id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CasePayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_number: Option<String>,
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub court: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CaseStatus>,
}

impl CasePayload {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "title", &self.title);
        require_text(&mut errors, "client_id", &self.client_id);
        if self.status == Some(CaseStatus::Unknown) {
            errors.push("status", "unknown status");
        }
        errors.into_result()
    }
}

/// A file attached to a case (`/cases/:id/documents`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDocument {
    pub id: RecordId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_list_row() {
        let case: LegalCase = serde_json::from_value(json!({
            "id": 14,
            "caseNumber": "2024/117",
            "title": "نزاع إيجار",
            "client": "شركة النور",
            "status": "under_review",
            "court": "المحكمة الابتدائية",
            "nextSession": "2024-11-03T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(case.id.as_str(), "14");
        assert_eq!(case.display_name(), "2024/117 - نزاع إيجار");
        assert_eq!(case.status_label(), Some("قيد النظر"));
        assert!(case.next_session.is_some());
    }

    #[test]
    fn unknown_status_keeps_row_readable() {
        let case: LegalCase =
            serde_json::from_value(json!({ "id": "c-1", "title": "x", "status": "sealed" })).unwrap();
        assert_eq!(case.status, CaseStatus::Unknown);
        assert_eq!(case.status_label(), Some(adala_core::UNKNOWN_LABEL));
        assert_eq!(case.display_name(), "x");
    }

    #[test]
    fn closed_cases_are_not_open() {
        assert!(CaseStatus::Postponed.is_open());
        assert!(!CaseStatus::Finished.is_open());
    }

    #[test]
    fn payload_requires_title_and_client() {
        let errors = CasePayload::default().validate().unwrap_err();
        assert!(errors.contains("title"));
        assert!(errors.contains("client_id"));

        let ok = CasePayload {
            title: "استئناف".into(),
            client_id: "9".into(),
            status: Some(CaseStatus::Appealed),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
        let body = serde_json::to_value(&ok).unwrap();
        assert_eq!(body["clientId"], "9");
        assert_eq!(body["status"], "appealed");
        assert!(body.get("court").is_none());
    }
}
