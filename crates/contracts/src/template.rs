use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_core::RecordId;

fn active() -> bool {
    true
}

/// Reusable contract body (`/contracts/templates`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractTemplate {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub contract_type: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// Placeholder names the template body expects.
    #[serde(default)]
    pub variables: serde_json::Value,
    #[serde(default = "active")]
    pub is_active: bool,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
