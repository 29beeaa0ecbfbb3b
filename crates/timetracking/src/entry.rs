use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_core::validation::require_text;
use adala_core::money::opt_money;
use adala_core::wire::opt_decimal;
use adala_core::{FieldErrors, Labeled, Money, RecordId, Resource};

/// Longest single entry accepted by the form.
const MAX_ENTRY_HOURS: f64 = 24.0;

adala_core::labeled_status! {
    pub enum BillingStatus {
        Unbilled => ("unbilled", "غير مفوتر"),
        Billed => ("billed", "مفوتر"),
        Paid => ("paid", "مدفوع"),
    }
}

fn unbilled() -> BillingStatus {
    BillingStatus::Unbilled
}

fn billable() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    #[serde(alias = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub user_id: Option<RecordId>,
    #[serde(default)]
    pub case_id: Option<RecordId>,
    #[serde(default)]
    pub client_id: Option<RecordId>,
    pub activity_date: DateTime<Utc>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub duration_hours: Option<f64>,
    pub description: String,
    #[serde(default = "billable")]
    pub is_billable: bool,
    #[serde(default, deserialize_with = "opt_money")]
    pub billing_rate: Option<Money>,
    #[serde(default = "unbilled")]
    pub billing_status: BillingStatus,
}

impl TimeEntry {
    /// Rate times hours, rounded to the minor unit, for billable entries;
    /// zero otherwise. `None` only if the product overflows.
    pub fn billable_amount(&self) -> Option<Money> {
        if !self.is_billable {
            return Some(Money::ZERO);
        }
        let rate = self.billing_rate.unwrap_or(Money::ZERO);
        rate.mul_rounded(self.duration_hours.unwrap_or(0.0))
    }
}

impl Resource for TimeEntry {
    const PATH: &'static str = "/timetracking/time-entries";
    const COLLECTION_KEY: &'static str = "timeEntries";
    const LABEL: &'static str = "سجل الوقت";
    const PLURAL_LABEL: &'static str = "سجلات الوقت";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_name(&self) -> String {
        format!(
            "{} ({})",
            self.description,
            self.activity_date.format("%Y-%m-%d")
        )
    }

    fn status_label(&self) -> Option<&str> {
        Some(self.billing_status.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeEntryPayload {
    pub activity_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub duration_hours: f64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    pub is_billable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_rate: Option<Money>,
}

impl TimeEntryPayload {
    /// An entry covering `start..end`, with the duration derived from them.
    pub fn from_span(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Self {
        let hours = (end - start).num_minutes() as f64 / 60.0;
        Self {
            activity_date: start,
            start_time: Some(start),
            end_time: Some(end),
            duration_hours: (hours * 100.0).round() / 100.0,
            description: description.into(),
            case_id: None,
            client_id: None,
            activity_type: None,
            is_billable: true,
            billing_rate: None,
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "description", &self.description);
        if !self.duration_hours.is_finite()
            || self.duration_hours <= 0.0
            || self.duration_hours > MAX_ENTRY_HOURS
        {
            errors.push("duration_hours", "must be between 0 and 24 hours");
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end <= start {
                errors.push("end_time", "must be after the start time");
            }
        }
        if self.is_billable && self.case_id.is_none() && self.client_id.is_none() {
            errors.push("case_id", "billable time needs a case or a client");
        }
        errors.into_result()
    }
}
