use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_core::money::opt_money;
use adala_core::wire::opt_decimal;
use adala_core::Money;

/// Filters for `GET /timetracking/time-entries-summary`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub user_id: Option<String>,
}

impl SummaryQuery {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(start) = self.start_date {
            pairs.push(("startDate".to_string(), start.to_rfc3339()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate".to_string(), end.to_rfc3339()));
        }
        if let Some(user) = &self.user_id {
            pairs.push(("userId".to_string(), user.clone()));
        }
        pairs
    }
}

/// One row of the per-user time summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSummary {
    #[serde(default, alias = "_id")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub total_hours: Option<f64>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub billable_hours: Option<f64>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub non_billable_hours: Option<f64>,
    #[serde(default, deserialize_with = "opt_money")]
    pub billable_amount: Option<Money>,
    #[serde(default)]
    pub entry_count: u64,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub utilization_rate: Option<f64>,
}
