use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_core::validation::require_text;
use adala_core::{FieldErrors, RecordId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskComment {
    pub id: RecordId,
    #[serde(default)]
    pub task_id: Option<RecordId>,
    pub content: String,
    #[serde(default)]
    pub created_by_name: Option<String>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentPayload {
    pub content: String,
}

impl CommentPayload {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "content", &self.content);
        errors.into_result()
    }
}

/// Body of `POST /tasks/:id/assign`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssignment {
    pub task_id: RecordId,
    pub assigned_to: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub notify_user: bool,
}

impl TaskAssignment {
    pub fn new(task_id: RecordId, assigned_to: RecordId) -> Self {
        Self {
            task_id,
            assigned_to,
            notes: None,
            notify_user: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_comment_is_refused() {
        assert!(CommentPayload::new(" \n").validate().unwrap_err().contains("content"));
        assert!(CommentPayload::new("تم رفع المستند").validate().is_ok());
    }

    #[test]
    fn assignment_notifies_by_default() {
        let assignment = TaskAssignment::new(
            RecordId::new("t1").unwrap(),
            RecordId::new("u7").unwrap(),
        );
        assert_eq!(
            serde_json::to_value(&assignment).unwrap(),
            json!({ "taskId": "t1", "assignedTo": "u7", "notifyUser": true })
        );
    }
}
