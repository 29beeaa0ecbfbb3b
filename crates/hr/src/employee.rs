use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use adala_core::validation::{is_valid_email, require_text};
use adala_core::money::opt_money;
use adala_core::{FieldErrors, Labeled, Money, RecordId, Resource};

/// Look-ahead window for the "contracts ending soon" report.
pub const DEFAULT_ENDING_SOON_DAYS: u32 = 30;

adala_core::labeled_status! {
    pub enum EmploymentStatus {
        Active => ("active", "نشط"),
        OnLeave => ("on_leave", "في إجازة"),
        Terminated => ("terminated", "منتهي الخدمة"),
        Retired => ("retired", "متقاعد"),
    }
}

adala_core::labeled_status! {
    pub enum ContractType {
        FullTime => ("full_time", "دوام كامل"),
        PartTime => ("part_time", "دوام جزئي"),
        Contract => ("contract", "عقد مؤقت"),
        Intern => ("intern", "متدرب"),
    }
}

adala_core::labeled_status! {
    pub enum Gender {
        Male => ("male", "ذكر"),
        Female => ("female", "أنثى"),
        Other => ("other", "آخر"),
    }
}

fn default_status() -> EmploymentStatus {
    EmploymentStatus::Active
}

fn default_contract() -> ContractType {
    ContractType::FullTime
}

/// HR records come from a document store and may carry `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(alias = "_id")]
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub id_number: Option<String>,
    #[serde(default)]
    pub hire_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub contract_end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub manager_id: Option<RecordId>,
    #[serde(default = "default_contract")]
    pub contract_type: ContractType,
    #[serde(default, deserialize_with = "opt_money")]
    pub base_salary: Option<Money>,
    #[serde(default = "default_status")]
    pub employment_status: EmploymentStatus,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Active employees whose contract ends within `days` of `now`.
    pub fn contract_ends_within(&self, now: DateTime<Utc>, days: u32) -> bool {
        if self.employment_status != EmploymentStatus::Active {
            return false;
        }
        let horizon = now + Duration::days(i64::from(days));
        self.contract_end_date
            .is_some_and(|end| end >= now && end <= horizon)
    }
}

impl Resource for Employee {
    const PATH: &'static str = "/hr/employees";
    const COLLECTION_KEY: &'static str = "employees";
    const LABEL: &'static str = "الموظف";
    const PLURAL_LABEL: &'static str = "الموظفين";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_name(&self) -> String {
        self.full_name()
    }

    fn status_label(&self) -> Option<&str> {
        Some(self.employment_status.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeePayload {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub hire_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_end_date: Option<DateTime<Utc>>,
    pub job_title: String,
    pub department: String,
    pub contract_type: ContractType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_salary: Option<Money>,
    pub employment_status: EmploymentStatus,
}

impl EmployeePayload {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "first_name", &self.first_name);
        require_text(&mut errors, "last_name", &self.last_name);
        require_text(&mut errors, "job_title", &self.job_title);
        require_text(&mut errors, "department", &self.department);
        if self.email.as_deref().is_some_and(|e| !is_valid_email(e)) {
            errors.push("email", "invalid email address");
        }
        if self.contract_end_date.is_some_and(|end| end <= self.hire_date) {
            errors.push("contract_end_date", "must be after the hire date");
        }
        if self.base_salary.is_some_and(|s| s.is_negative()) {
            errors.push("base_salary", "must be a non-negative amount");
        }
        errors.into_result()
    }
}
