use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_core::validation::require_text;
use adala_core::money::opt_money;
use adala_core::{FieldErrors, Labeled, Money, RecordId, Resource};

adala_core::labeled_status! {
    pub enum ConsultationStatus {
        Scheduled => ("scheduled", "مجدولة"),
        InProgress => ("in_progress", "جارية"),
        Completed => ("completed", "مكتملة"),
        Cancelled => ("cancelled", "ملغاة"),
        Rescheduled => ("rescheduled", "معاد جدولتها"),
        NoShow => ("no_show", "لم يحضر"),
    }
}

impl ConsultationStatus {
    /// Statuses from which no further action is offered.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }

    pub fn can_start(&self) -> bool {
        matches!(self, Self::Scheduled | Self::Rescheduled)
    }

    pub fn can_complete(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    pub fn can_cancel(&self) -> bool {
        !self.is_final() && *self != Self::Unknown
    }

    pub fn can_reschedule(&self) -> bool {
        matches!(self, Self::Scheduled | Self::Rescheduled | Self::NoShow)
    }
}

adala_core::labeled_status! {
    pub enum ConsultationType {
        Initial => ("initial", "أولية"),
        FollowUp => ("follow_up", "متابعة"),
        Emergency => ("emergency", "طارئة"),
        Routine => ("routine", "دورية"),
        Specialized => ("specialized", "متخصصة"),
    }
}

adala_core::labeled_status! {
    pub enum ConsultationMode {
        InPerson => ("in_person", "حضوري"),
        Video => ("video", "فيديو"),
        Phone => ("phone", "هاتف"),
        Email => ("email", "بريد إلكتروني"),
        Chat => ("chat", "محادثة"),
    }
}

adala_core::labeled_status! {
    pub enum ConsultationPriority {
        Low => ("low", "منخفضة"),
        Medium => ("medium", "متوسطة"),
        High => ("high", "عالية"),
        Urgent => ("urgent", "عاجلة"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub client_id: Option<RecordId>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub attorney_name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<ConsultationType>,
    pub status: ConsultationStatus,
    #[serde(default)]
    pub mode: Option<ConsultationMode>,
    #[serde(default)]
    pub priority: Option<ConsultationPriority>,
    pub scheduled_date: DateTime<Utc>,
    /// Planned length in minutes.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default, deserialize_with = "opt_money")]
    pub fee: Option<Money>,
    #[serde(default)]
    pub is_paid: Option<bool>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub follow_up_required: Option<bool>,
}

impl Resource for Consultation {
    const PATH: &'static str = "/consultations";
    const COLLECTION_KEY: &'static str = "consultations";
    const LABEL: &'static str = "الاستشارة";
    const PLURAL_LABEL: &'static str = "الاستشارات";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_name(&self) -> String {
        match self.client_name.as_deref() {
            Some(client) if !client.is_empty() => format!("{} ({client})", self.title),
            _ => self.title.clone(),
        }
    }

    fn status_label(&self) -> Option<&str> {
        Some(self.status.label())
    }
}

/// Body of `POST /consultations` and `PUT /consultations/:id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationPayload {
    pub title: String,
    pub client_id: String,
    #[serde(rename = "type")]
    pub kind: ConsultationType,
    pub mode: ConsultationMode,
    pub priority: ConsultationPriority,
    pub scheduled_date: DateTime<Utc>,
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
}

impl ConsultationPayload {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "title", &self.title);
        require_text(&mut errors, "client_id", &self.client_id);
        if self.duration == 0 {
            errors.push("duration", "must be at least one minute");
        }
        let remote = matches!(self.mode, ConsultationMode::Video);
        if remote && self.meeting_link.as_deref().is_none_or(|l| l.trim().is_empty()) {
            errors.push("meeting_link", "required for video consultations");
        }
        errors.into_result()
    }
}

/// Body of `PATCH /consultations/:id/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRequest {
    pub status: ConsultationStatus,
}

/// Body of `POST /consultations/:id/complete`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompleteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Body of `POST /consultations/:id/cancel`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CancelRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Body of `POST /consultations/:id/reschedule`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleRequest {
    pub scheduled_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RescheduleRequest {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.scheduled_date <= now {
            errors.push("scheduled_date", "must be in the future");
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 10, h, 0, 0).unwrap()
    }

    #[test]
    fn decodes_frontend_shape() {
        let c: Consultation = serde_json::from_value(json!({
            "id": "k1",
            "title": "استشارة عمالية",
            "clientName": "خالد",
            "type": "follow_up",
            "status": "no_show",
            "mode": "video",
            "priority": "urgent",
            "scheduledDate": "2024-09-10T10:00:00Z",
            "duration": 45,
            "fee": "300"
        }))
        .unwrap();
        assert_eq!(c.kind, Some(ConsultationType::FollowUp));
        assert_eq!(c.status_label(), Some("لم يحضر"));
        assert_eq!(c.display_name(), "استشارة عمالية (خالد)");
        assert_eq!(c.fee, Some(Money::from_minor(30_000)));
    }

    #[test]
    fn lifecycle_guards() {
        assert!(ConsultationStatus::Scheduled.can_start());
        assert!(!ConsultationStatus::Completed.can_start());
        assert!(ConsultationStatus::InProgress.can_complete());
        assert!(ConsultationStatus::InProgress.can_cancel());
        assert!(!ConsultationStatus::Cancelled.can_cancel());
        assert!(ConsultationStatus::NoShow.can_reschedule());
        assert!(!ConsultationStatus::Unknown.can_cancel());
    }

    #[test]
    fn video_needs_meeting_link() {
        let mut payload = ConsultationPayload {
            title: "مراجعة عقد".into(),
            client_id: "5".into(),
            kind: ConsultationType::Initial,
            mode: ConsultationMode::Video,
            priority: ConsultationPriority::Medium,
            scheduled_date: at(11),
            duration: 30,
            description: None,
            location: None,
            meeting_link: None,
        };
        assert!(payload.validate().unwrap_err().contains("meeting_link"));
        payload.meeting_link = Some("https://meet.example/abc".into());
        assert!(payload.validate().is_ok());
        assert_eq!(serde_json::to_value(&payload).unwrap()["type"], "initial");
    }

    #[test]
    fn reschedule_must_be_in_future() {
        let req = RescheduleRequest {
            scheduled_date: at(9),
            reason: None,
        };
        assert!(req.validate(at(10)).is_err());
        assert!(req.validate(at(8)).is_ok());
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "scheduledDate": "2024-09-10T09:00:00Z" })
        );
    }
}
