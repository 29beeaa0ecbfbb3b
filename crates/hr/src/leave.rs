use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_core::{FieldErrors, Labeled, RecordId, RecordRef, Resource};

/// Smallest request the backend accepts: half a day.
pub const MIN_LEAVE_DAYS: f64 = 0.5;

adala_core::labeled_status! {
    pub enum LeaveStatus {
        Pending => ("pending", "قيد الانتظار"),
        Approved => ("approved", "موافق عليها"),
        Rejected => ("rejected", "مرفوضة"),
    }
}

fn default_status() -> LeaveStatus {
    LeaveStatus::Pending
}

/// A leave request. `employee_id` and `leave_type` come back populated on
/// list endpoints and as bare ids elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leave {
    #[serde(alias = "_id")]
    pub id: RecordId,
    pub employee_id: RecordRef,
    pub leave_type: RecordRef,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub days: f64,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default = "default_status")]
    pub status: LeaveStatus,
    #[serde(default)]
    pub approved_by: Option<RecordRef>,
    #[serde(default)]
    pub approval_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Leave {
    /// Only pending requests can be approved or rejected.
    pub fn is_decidable(&self) -> bool {
        self.status == LeaveStatus::Pending
    }

    /// True when `at` falls inside the leave, both ends included.
    pub fn covers(&self, at: DateTime<Utc>) -> bool {
        self.start_date <= at && at <= self.end_date
    }
}

impl Resource for Leave {
    const PATH: &'static str = "/hr/leaves";
    const COLLECTION_KEY: &'static str = "leaves";
    const LABEL: &'static str = "الإجازة";
    const PLURAL_LABEL: &'static str = "الإجازات";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_name(&self) -> String {
        format!("{} ({})", self.employee_id.label(), self.leave_type.label())
    }

    fn status_label(&self) -> Option<&str> {
        Some(self.status.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeavePayload {
    pub employee_id: RecordId,
    pub leave_type: RecordId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub days: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LeavePayload {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.end_date < self.start_date {
            errors.push("end_date", "cannot be before the start date");
        }
        if !self.days.is_finite() || self.days < MIN_LEAVE_DAYS {
            errors.push("days", format!("must be at least {MIN_LEAVE_DAYS}"));
        }
        errors.into_result()
    }
}

/// Body of `POST /hr/leaves/:id/reject`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveRejection {
    pub reason: String,
}

impl LeaveRejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into().trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        adala_core::validation::require_text(&mut errors, "reason", &self.reason);
        errors.into_result()
    }
}
