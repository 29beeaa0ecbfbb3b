use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use adala_core::{Labeled, RecordId, Resource};

adala_core::labeled_status! {
    pub enum AuditStatus {
        Success => ("SUCCESS", "نجاح"),
        Failure => ("FAILURE", "فشل"),
        Warning => ("WARNING", "تحذير"),
        Info => ("INFO", "معلومات"),
    }
}

adala_core::labeled_status! {
    pub enum AuditSeverity {
        Low => ("LOW", "منخفض"),
        Medium => ("MEDIUM", "متوسط"),
        High => ("HIGH", "مرتفع"),
        Critical => ("CRITICAL", "حرج"),
    }
}

/// One entry of the tenant's audit trail. Read-only from this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: RecordId,
    #[serde(default)]
    pub user_id: Option<RecordId>,
    pub action: String,
    pub entity_type: String,
    #[serde(default)]
    pub entity_id: Option<RecordId>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<AuditStatus>,
    #[serde(default)]
    pub severity: Option<AuditSeverity>,
    #[serde(default)]
    pub old_values: Option<Value>,
    #[serde(default)]
    pub new_values: Option<Value>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl AuditLog {
    /// Top-level fields whose value differs between `old_values` and
    /// `new_values`, sorted.
    pub fn changed_fields(&self) -> Vec<String> {
        let empty = serde_json::Map::new();
        let old = self.old_values.as_ref().and_then(Value::as_object).unwrap_or(&empty);
        let new = self.new_values.as_ref().and_then(Value::as_object).unwrap_or(&empty);
        let mut fields: Vec<String> = old
            .keys()
            .chain(new.keys())
            .filter(|k| old.get(*k) != new.get(*k))
            .cloned()
            .collect();
        fields.sort();
        fields.dedup();
        fields
    }
}

impl Resource for AuditLog {
    const PATH: &'static str = "/audit-logs";
    const COLLECTION_KEY: &'static str = "auditLogs";
    const LABEL: &'static str = "سجل التدقيق";
    const PLURAL_LABEL: &'static str = "سجلات التدقيق";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_name(&self) -> String {
        match &self.description {
            Some(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => format!("{} {}", self.action, self.entity_type),
        }
    }

    fn status_label(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.label())
    }
}

/// Filters for `GET /audit-logs` and `GET /audit-logs/stats/summary`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub user_id: Option<RecordId>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<RecordId>,
    pub status: Option<AuditStatus>,
    pub severity: Option<AuditSeverity>,
    pub search: Option<String>,
}

impl AuditQuery {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut put = |key: &str, value: String| {
            if !value.trim().is_empty() {
                pairs.push((key.to_string(), value.trim().to_string()));
            }
        };
        if let Some(start) = self.start_date {
            put("start_date", start.to_rfc3339());
        }
        if let Some(end) = self.end_date {
            put("end_date", end.to_rfc3339());
        }
        if let Some(user) = &self.user_id {
            put("user_id", user.to_string());
        }
        if let Some(action) = &self.action {
            put("action", action.clone());
        }
        if let Some(kind) = &self.entity_type {
            put("entity_type", kind.clone());
        }
        if let Some(entity) = &self.entity_id {
            put("entity_id", entity.to_string());
        }
        if let Some(status) = self.status {
            put("status", status.as_str().to_string());
        }
        if let Some(severity) = self.severity {
            put("severity", severity.as_str().to_string());
        }
        if let Some(search) = &self.search {
            put("search", search.clone());
        }
        pairs
    }
}

/// A `{ value, label }` pair from `/audit-logs/options/*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditOption {
    pub value: String,
    pub label: String,
}

/// A `{ <key>: "...", count: n }` row of a grouped count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    #[serde(
        alias = "action",
        alias = "entity_type",
        alias = "status",
        alias = "severity",
        alias = "date",
        default
    )]
    pub key: Option<String>,
    #[serde(with = "count_text")]
    pub count: u64,
}

/// Aggregates count with `COUNT(...)`, which some drivers return as text.
mod count_text {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(count: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(*count)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("not a count: {s:?}"))),
        }
    }
}

/// Body of `GET /audit-logs/stats/summary`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub action_counts: Vec<GroupCount>,
    #[serde(default)]
    pub entity_type_counts: Vec<GroupCount>,
    #[serde(default)]
    pub status_counts: Vec<GroupCount>,
    #[serde(default)]
    pub severity_counts: Vec<GroupCount>,
    #[serde(default)]
    pub daily_counts: Vec<GroupCount>,
}

impl AuditSummary {
    pub fn count_for_status(&self, status: AuditStatus) -> u64 {
        self.status_counts
            .iter()
            .filter(|row| row.key.as_deref() == Some(status.as_str()))
            .map(|row| row.count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_entries_and_lists_changed_fields() {
        let entry: AuditLog = serde_json::from_value(json!({
            "id": "0190b2c4-7d3e-7000-8000-000000000001",
            "action": "UPDATE",
            "entity_type": "CASE",
            "status": "SUCCESS",
            "severity": "LOW",
            "old_values": { "title": "أ", "status": "open", "court": "الرياض" },
            "new_values": { "title": "ب", "status": "open", "judge": "س" }
        }))
        .unwrap();
        assert_eq!(entry.status_label(), Some("نجاح"));
        assert_eq!(entry.display_name(), "UPDATE CASE");
        assert_eq!(entry.changed_fields(), ["court", "judge", "title"]);
    }

    #[test]
    fn summary_accepts_text_counts() {
        let summary: AuditSummary = serde_json::from_value(json!({
            "total_count": 12,
            "status_counts": [
                { "status": "SUCCESS", "count": "9" },
                { "status": "FAILURE", "count": 3 }
            ],
            "daily_counts": [{ "date": "2024-05-01T00:00:00.000Z", "count": "12" }]
        }))
        .unwrap();
        assert_eq!(summary.count_for_status(AuditStatus::Success), 9);
        assert_eq!(summary.count_for_status(AuditStatus::Warning), 0);
        assert_eq!(summary.daily_counts[0].count, 12);
    }

    #[test]
    fn blank_filters_are_dropped() {
        let query = AuditQuery {
            action: Some("  ".into()),
            severity: Some(AuditSeverity::Critical),
            ..AuditQuery::default()
        };
        assert_eq!(query.query_pairs(), vec![("severity".to_string(), "CRITICAL".to_string())]);
    }
}
