use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_core::money::opt_money;
use adala_core::{FieldErrors, Money, RecordId};

use crate::contract::DEFAULT_CURRENCY;

adala_core::labeled_status! {
    pub enum PaymentStatus {
        Pending => ("pending", "قيد الانتظار"),
        Completed => ("completed", "مكتمل"),
        Failed => ("failed", "فاشل"),
        Refunded => ("refunded", "مسترد"),
    }
}

fn default_payment_status() -> PaymentStatus {
    PaymentStatus::Completed
}

/// A payment recorded against a contract (`/contracts/:id/payments`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractPayment {
    pub id: RecordId,
    #[serde(default)]
    pub contract_id: Option<RecordId>,
    #[serde(default, deserialize_with = "opt_money")]
    pub amount: Option<Money>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub payment_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default = "default_payment_status")]
    pub status: PaymentStatus,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub installment_number: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentPayload {
    pub amount: Money,
    pub currency: String,
    pub payment_date: DateTime<Utc>,
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installment_number: Option<u32>,
}

impl PaymentPayload {
    pub fn new(amount: Money, payment_date: DateTime<Utc>, method: impl Into<String>) -> Self {
        Self {
            amount,
            currency: DEFAULT_CURRENCY.to_string(),
            payment_date,
            payment_method: method.into(),
            reference_number: None,
            installment_number: None,
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if !self.amount.is_positive() {
            errors.push("amount", "must be greater than zero");
        }
        adala_core::validation::require_text(&mut errors, "payment_method", &self.payment_method);
        if self.installment_number == Some(0) {
            errors.push("installment_number", "installments start at 1");
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn paid_on() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn status_defaults_to_completed() {
        let payment: ContractPayment =
            serde_json::from_value(serde_json::json!({ "id": 1, "amount": 500 })).unwrap();
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.amount, Some(Money::from_minor(50_000)));
    }

    #[test]
    fn zeroth_installment_is_rejected() {
        let mut payload = PaymentPayload::new(Money::from_minor(10_000), paid_on(), "bank_transfer");
        payload.installment_number = Some(0);
        assert!(payload.validate().unwrap_err().contains("installment_number"));
    }

    proptest! {
        #[test]
        fn non_positive_amounts_are_rejected(minor in -100_000_000_000i64..=0) {
            let payload = PaymentPayload::new(Money::from_minor(minor), paid_on(), "cash");
            prop_assert!(payload.validate().unwrap_err().contains("amount"));
        }

        #[test]
        fn positive_amounts_pass(minor in 1i64..100_000_000_000) {
            let payload = PaymentPayload::new(Money::from_minor(minor), paid_on(), "cash");
            prop_assert!(payload.validate().is_ok());
        }
    }
}
