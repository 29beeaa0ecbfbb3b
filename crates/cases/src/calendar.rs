use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_core::validation::require_text;
use adala_core::{FieldErrors, Labeled, RecordId, Resource};

adala_core::labeled_status! {
    pub enum EventType {
        CourtSession => ("court_session", "جلسة محكمة"),
        Consultation => ("consultation", "استشارة"),
        Deadline => ("deadline", "موعد نهائي"),
        Reminder => ("reminder", "تذكير"),
        Meeting => ("meeting", "اجتماع"),
    }
}

/// An entry of the practice calendar (`/calendar/events`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: RecordId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub start_date_time: DateTime<Utc>,
    #[serde(default)]
    pub end_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Kind of record the event belongs to (`case`, `consultation`...).
    #[serde(default)]
    pub related_type: Option<String>,
    #[serde(default)]
    pub related_id: Option<RecordId>,
}

impl Resource for CalendarEvent {
    const PATH: &'static str = "/calendar/events";
    const COLLECTION_KEY: &'static str = "events";
    const LABEL: &'static str = "الحدث";
    const PLURAL_LABEL: &'static str = "الأحداث";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_name(&self) -> String {
        self.title.clone()
    }

    fn status_label(&self) -> Option<&str> {
        Some(self.kind.label())
    }
}

/// Body of `POST /calendar/events` and `PUT /calendar/events/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub all_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
}

impl EventPayload {
    pub fn new(title: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            kind: EventType::Meeting,
            start_date_time: start,
            end_date_time: end,
            all_day: false,
            description: None,
            location: None,
            related_type: None,
            related_id: None,
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "title", &self.title);
        if self.kind == EventType::Unknown {
            errors.push("type", "unknown event type");
        }
        if self.end_date_time < self.start_date_time {
            errors.push("end_date_time", "must not be before the start");
        }
        if self.related_id.is_some() != self.related_type.is_some() {
            errors.push("related_id", "related type and id go together");
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
        Utc.with_ymd_and_hms(2024, 12, 1, h, 0, 0).unwrap()
    }

    #[test]
    fn decodes_event_row() {
        let event: CalendarEvent = serde_json::from_value(json!({
            "id": "e-3",
            "title": "جلسة استئناف",
            "type": "court_session",
            "startDateTime": "2024-12-01T09:00:00Z",
            "relatedType": "case",
            "relatedId": 14
        }))
        .unwrap();
        assert_eq!(event.kind, EventType::CourtSession);
        assert_eq!(event.status_label(), Some("جلسة محكمة"));
        assert!(!event.all_day);
        assert_eq!(event.related_id.map(|r| r.to_string()).as_deref(), Some("14"));
    }

    #[test]
    fn payload_rejects_inverted_span() {
        let mut payload = EventPayload::new("اجتماع الفريق", at(11), at(10));
        assert!(payload.validate().unwrap_err().contains("end_date_time"));
        payload.end_date_time = at(12);
        assert!(payload.validate().is_ok());
        payload.related_type = Some("case".into());
        assert!(payload.validate().unwrap_err().contains("related_id"));
    }

    #[test]
    fn payload_wire_shape() {
        let body = serde_json::to_value(EventPayload::new("x", at(9), at(10))).unwrap();
        assert_eq!(body["type"], "meeting");
        assert_eq!(body["allDay"], false);
        assert!(body.get("location").is_none());
    }
}
