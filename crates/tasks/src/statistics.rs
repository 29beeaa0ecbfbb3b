use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_core::wire::opt_decimal;
use adala_core::RecordId;

use crate::task::{TaskPriority, TaskStatus};

/// Filters for `GET /tasks/statistics`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatisticsQuery {
    pub user_id: Option<RecordId>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl StatisticsQuery {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(user) = &self.user_id {
            pairs.push(("userId".to_string(), user.to_string()));
        }
        if let Some(from) = self.date_from {
            pairs.push(("dateFrom".to_string(), from.to_rfc3339()));
        }
        if let Some(to) = self.date_to {
            pairs.push(("dateTo".to_string(), to.to_rfc3339()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCount {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    pub date: String,
    #[serde(default)]
    pub count: u64,
}

/// Counters behind the task dashboard. Per-status and per-priority maps
/// are keyed by wire code, so codes this client does not know survive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatistics {
    #[serde(default)]
    pub total_tasks: u64,
    #[serde(default)]
    pub completed_tasks: u64,
    #[serde(default)]
    pub overdue_tasks: u64,
    #[serde(default)]
    pub upcoming_tasks: u64,
    #[serde(default)]
    pub tasks_by_status: BTreeMap<String, u64>,
    #[serde(default)]
    pub tasks_by_priority: BTreeMap<String, u64>,
    #[serde(default)]
    pub tasks_by_assignee: BTreeMap<String, NamedCount>,
    #[serde(default)]
    pub tasks_by_category: BTreeMap<String, NamedCount>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub average_completion_time: Option<f64>,
    #[serde(default)]
    pub tasks_trend_by_day: Vec<DayCount>,
}

impl TaskStatistics {
    pub fn count_for_status(&self, status: TaskStatus) -> u64 {
        self.tasks_by_status.get(status.as_str()).copied().unwrap_or(0)
    }

    pub fn count_for_priority(&self, priority: TaskPriority) -> u64 {
        self.tasks_by_priority.get(priority.as_str()).copied().unwrap_or(0)
    }

    /// Completed share of all tasks, 0–100. `None` with no tasks.
    pub fn completion_rate(&self) -> Option<f64> {
        (self.total_tasks > 0)
            .then(|| self.completed_tasks as f64 * 100.0 / self.total_tasks as f64)
    }
}
