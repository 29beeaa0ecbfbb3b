use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_core::validation::require_text;
use adala_core::{FieldErrors, RecordId};

/// A court hearing scheduled for a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSession {
    pub id: RecordId,
    #[serde(default)]
    pub case_id: Option<RecordId>,
    pub session_date: DateTime<Utc>,
    #[serde(default)]
    pub court: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub judge: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub next_session_date: Option<DateTime<Utc>>,
}

/// Body of `POST /cases/:id/sessions` and `PUT /cases/:id/sessions/:sid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSessionPayload {
    pub session_date: DateTime<Utc>,
    pub court: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_session_date: Option<DateTime<Utc>>,
}

impl CaseSessionPayload {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "court", &self.court);
        if self
            .next_session_date
            .is_some_and(|next| next <= self.session_date)
        {
            errors.push("next_session_date", "must be after the session date");
        }
        errors.into_result()
    }
}
