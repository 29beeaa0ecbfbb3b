use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_core::validation::require_text;
use adala_core::{FieldErrors, Labeled, RecordId, Resource};

adala_core::labeled_status! {
    pub enum DocumentStatus {
        Draft => ("draft", "مسودة"),
        Active => ("active", "نشط"),
        Archived => ("archived", "مؤرشف"),
        Deleted => ("deleted", "محذوف"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub upload_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category_id: Option<RecordId>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: DocumentStatus,
    #[serde(default)]
    pub version_number: Option<u32>,
    #[serde(default)]
    pub is_latest_version: Option<bool>,
    #[serde(default)]
    pub shareable_link: Option<String>,
}

impl Document {
    /// File size for list rendering, e.g. `1.5 MB`.
    pub fn size_text(&self) -> Option<String> {
        const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
        let bytes = self.file_size?;
        let mut size = bytes as f64;
        let mut unit = 0;
        while size >= 1024.0 && unit < UNITS.len() - 1 {
            size /= 1024.0;
            unit += 1;
        }
        Some(if unit == 0 {
            format!("{bytes} B")
        } else {
            format!("{size:.1} {}", UNITS[unit])
        })
    }
}

impl Resource for Document {
    const PATH: &'static str = "/documents";
    const COLLECTION_KEY: &'static str = "documents";
    const LABEL: &'static str = "المستند";
    const PLURAL_LABEL: &'static str = "المستندات";

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

/// Metadata update for `PUT /documents/:id`; the file itself is not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpdate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DocumentStatus>,
}

impl DocumentUpdate {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "title", &self.title);
        if self.tags.iter().any(|t| t.trim().is_empty()) {
            errors.push("tags", "tags must not be blank");
        }
        errors.into_result()
    }
}

/// One entry of `/documents/:id/versions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersion {
    pub id: RecordId,
    #[serde(default)]
    pub document_id: Option<RecordId>,
    pub version_number: u32,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub upload_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub change_description: Option<String>,
}

/// Folder-like grouping (`/documents/categories`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCategory {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_category_id: Option<RecordId>,
    #[serde(default)]
    pub document_count: Option<u64>,
}
