use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_core::validation::is_valid_email;
use adala_core::FieldErrors;

/// Body of `POST /documents/:id/share`.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub allow_download: bool,
    pub allow_print: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipient_emails: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl core::fmt::Debug for ShareSettings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShareSettings")
            .field("expiry_date", &self.expiry_date)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("allow_download", &self.allow_download)
            .field("allow_print", &self.allow_print)
            .field("recipient_emails", &self.recipient_emails)
            .finish()
    }
}

impl ShareSettings {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.expiry_date.is_some_and(|exp| exp <= now) {
            errors.push("expiry_date", "must be in the future");
        }
        if self.recipient_emails.iter().any(|e| !is_valid_email(e)) {
            errors.push("recipient_emails", "invalid email address");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    pub shareable_link: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn past_expiry_and_bad_recipients_fail() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let settings = ShareSettings {
            expiry_date: Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()),
            recipient_emails: vec!["ok@firm.test".into(), "broken".into()],
            ..Default::default()
        };
        let errors = settings.validate(now).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn serializes_camel_case_and_hides_password_in_debug() {
        let settings = ShareSettings {
            password: Some("s3cret".into()),
            allow_download: true,
            ..Default::default()
        };
        let body = serde_json::to_value(&settings).unwrap();
        assert_eq!(body["allowDownload"], true);
        assert_eq!(body["allowPrint"], false);
        assert!(!format!("{settings:?}").contains("s3cret"));
    }
}
