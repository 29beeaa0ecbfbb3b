//! Errors surfaced by the HTTP client and the screen controllers.

use thiserror::Error;

use adala_auth::LoginRejected;
use adala_core::{DomainError, FieldErrors};

use crate::config::ConfigError;

pub type ClientResult<T> = Result<T, ClientError>;

/// Message keys rendered by the notification layer.
pub mod keys {
    pub const SESSION_EXPIRED: &str = "AUTH.SESSION_EXPIRED";
    pub const INVALID_CREDENTIALS: &str = "AUTH.INVALID_CREDENTIALS";
    pub const FORBIDDEN: &str = "COMMON.FORBIDDEN";
    pub const NOT_FOUND: &str = "COMMON.NOT_FOUND";
    pub const VALIDATION: &str = "COMMON.VALIDATION_ERROR";
    pub const ERROR_OCCURRED: &str = "COMMON.ERROR_OCCURRED";
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// HTTP 401, or a call that needs a session made without one.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// HTTP 401 from the sign-in endpoints themselves: wrong password or
    /// two-factor code, not an expired session.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Local form validation failed; nothing was sent.
    #[error("invalid fields: {0}")]
    Validation(FieldErrors),

    /// A controller operation was called in a state that does not allow it.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        if status == 401 {
            Self::Unauthorized(message.into())
        } else {
            Self::Api {
                status,
                message: message.into(),
            }
        }
    }

    /// HTTP status, when the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized(_) | Self::InvalidCredentials(_) => Some(401),
            _ => None,
        }
    }

    /// A 401 from a sign-in call means the credentials were refused.
    pub fn into_credentials_error(self) -> Self {
        match self {
            Self::Unauthorized(message) => Self::InvalidCredentials(message),
            other => other,
        }
    }

    /// Localized message key for the notification layer.
    pub fn message_key(&self) -> &'static str {
        if matches!(self, Self::InvalidCredentials(_)) {
            return keys::INVALID_CREDENTIALS;
        }
        match self.status() {
            Some(401) => keys::SESSION_EXPIRED,
            Some(403) => keys::FORBIDDEN,
            Some(404) => keys::NOT_FOUND,
            _ if matches!(self, Self::Validation(_)) => keys::VALIDATION,
            _ => keys::ERROR_OCCURRED,
        }
    }

    /// The backend's own `message`, when it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. }
            | Self::Unauthorized(message)
            | Self::InvalidCredentials(message)
                if !message.is_empty() =>
            {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}

impl From<DomainError> for ClientError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidFields(fields) => Self::Validation(fields),
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
                let mut fields = FieldErrors::new();
                fields.push("input", msg);
                Self::Validation(fields)
            }
            DomainError::Malformed(msg) => Self::Parse(msg),
            DomainError::InvariantViolation(msg) => Self::InvalidState(msg),
            DomainError::NotFound => Self::api(404, "not found"),
            DomainError::Unauthorized => Self::Unauthorized(String::new()),
        }
    }
}

impl From<FieldErrors> for ClientError {
    fn from(fields: FieldErrors) -> Self {
        Self::Validation(fields)
    }
}

impl From<LoginRejected> for ClientError {
    fn from(err: LoginRejected) -> Self {
        match err {
            LoginRejected::Invalid(fields) => Self::Validation(fields),
            other => Self::InvalidState(other.to_string()),
        }
    }
}
