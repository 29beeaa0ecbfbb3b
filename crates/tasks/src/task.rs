use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_core::validation::require_text;
use adala_core::wire::opt_decimal;
use adala_core::{FieldErrors, Labeled, RecordId, Resource};

adala_core::labeled_status! {
    pub enum TaskStatus {
        Todo => ("todo", "قيد الانتظار"),
        InProgress => ("in_progress", "قيد التنفيذ"),
        Review => ("review", "قيد المراجعة"),
        Completed => ("completed", "مكتملة"),
        Cancelled => ("cancelled", "ملغاة"),
        Blocked => ("blocked", "متوقفة"),
        Deferred => ("deferred", "مؤجلة"),
    }
}

impl TaskStatus {
    /// Completed and cancelled tasks are closed; nothing is overdue there.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

adala_core::labeled_status! {
    pub enum TaskPriority {
        Low => ("low", "منخفضة"),
        Medium => ("medium", "متوسطة"),
        High => ("high", "عالية"),
        Urgent => ("urgent", "عاجلة"),
    }
}

fn default_status() -> TaskStatus {
    TaskStatus::Todo
}

fn default_priority() -> TaskPriority {
    TaskPriority::Medium
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_status")]
    pub status: TaskStatus,
    #[serde(default = "default_priority")]
    pub priority: TaskPriority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assigned_to: Option<RecordId>,
    #[serde(default)]
    pub assigned_to_name: Option<String>,
    #[serde(default)]
    pub created_by_name: Option<String>,
    #[serde(default)]
    pub category_id: Option<RecordId>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub related_document_ids: Vec<RecordId>,
    #[serde(default)]
    pub related_consultation_ids: Vec<RecordId>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub estimated_hours: Option<f64>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub actual_hours: Option<f64>,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub parent_task_id: Option<RecordId>,
}

impl Task {
    /// Past its due date and still open.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_closed() && self.due_date.is_some_and(|due| due < now)
    }
}

impl Resource for Task {
    const PATH: &'static str = "/tasks";
    const COLLECTION_KEY: &'static str = "tasks";
    const LABEL: &'static str = "المهمة";
    const PLURAL_LABEL: &'static str = "المهام";

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

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

impl TaskPayload {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: default_status(),
            priority: default_priority(),
            due_date: None,
            start_date: None,
            assigned_to: None,
            category_id: None,
            tags: Vec::new(),
            estimated_hours: None,
            progress: None,
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "title", &self.title);
        if let (Some(start), Some(due)) = (self.start_date, self.due_date) {
            if due < start {
                errors.push("dueDate", "cannot be before the start date");
            }
        }
        if self
            .estimated_hours
            .is_some_and(|h| !h.is_finite() || h < 0.0)
        {
            errors.push("estimatedHours", "must be zero or more");
        }
        if self.progress.is_some_and(|p| p > 100) {
            errors.push("progress", "must be between 0 and 100");
        }
        errors.into_result()
    }
}

/// Filters for `GET /tasks` and `GET /tasks/search`. Repeated keys carry
/// multi-valued filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskQuery {
    pub query: Option<String>,
    pub statuses: Vec<TaskStatus>,
    pub priorities: Vec<TaskPriority>,
    pub assigned_to: Option<RecordId>,
    pub category_id: Option<RecordId>,
    pub tags: Vec<String>,
    pub due_from: Option<DateTime<Utc>>,
    pub due_to: Option<DateTime<Utc>>,
    pub is_overdue: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl TaskQuery {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut put = |key: &str, value: String| pairs.push((key.to_string(), value));
        if let Some(q) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            put("query", q.to_string());
        }
        for status in &self.statuses {
            put("status", status.as_str().to_string());
        }
        for priority in &self.priorities {
            put("priority", priority.as_str().to_string());
        }
        if let Some(user) = &self.assigned_to {
            put("assignedTo", user.to_string());
        }
        if let Some(category) = &self.category_id {
            put("categoryId", category.to_string());
        }
        for tag in &self.tags {
            put("tags", tag.clone());
        }
        if let Some(from) = self.due_from {
            put("dueDateFrom", from.to_rfc3339());
        }
        if let Some(to) = self.due_to {
            put("dueDateTo", to.to_rfc3339());
        }
        if let Some(overdue) = self.is_overdue {
            put("isOverdue", overdue.to_string());
        }
        if let Some(page) = self.page {
            put("page", page.to_string());
        }
        if let Some(limit) = self.limit {
            put("limit", limit.to_string());
        }
        pairs
    }
}
