use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_core::validation::require_text;
use adala_core::{FieldErrors, RecordId};

/// A note on a consultation; private notes are visible to attorneys only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationNote {
    pub id: RecordId,
    #[serde(default)]
    pub consultation_id: Option<RecordId>,
    pub content: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub created_by_name: Option<String>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePayload {
    pub content: String,
    pub is_private: bool,
}

impl NotePayload {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "content", &self.content);
        errors.into_result()
    }
}
