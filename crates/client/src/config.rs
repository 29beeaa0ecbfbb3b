//! Client configuration.
//!
//! Values come from the environment, with defaults suited to a local
//! backend. The CLI layers its own flags on top.

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

pub const API_URL_ENV: &str = "ADALA_API_URL";
pub const TIMEOUT_ENV: &str = "ADALA_API_TIMEOUT_SECS";
pub const LOCALE_ENV: &str = "ADALA_LOCALE";
pub const SESSION_PATH_ENV: &str = "ADALA_SESSION_PATH";

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOCALE: &str = "ar";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid API URL '{0}'")]
    InvalidUrl(String),

    #[error("invalid timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),

    #[error("no data directory available for the session file; set {SESSION_PATH_ENV}")]
    NoDataDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root; request paths are appended to it.
    pub api_url: Url,
    pub timeout_secs: u64,
    /// Sent as `Accept-Language`.
    pub locale: String,
    /// Where a remembered session is stored.
    pub session_path: PathBuf,
}

impl ClientConfig {
    pub fn new(api_url: &str, session_path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            locale: DEFAULT_LOCALE.to_string(),
            session_path: session_path.into(),
        })
    }

    /// Load from `ADALA_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key/value source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = parse_api_url(get(API_URL_ENV).as_deref().unwrap_or(DEFAULT_API_URL))?;

        let timeout_secs = match get(TIMEOUT_ENV) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let session_path = match get(SESSION_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => default_session_path()?,
        };

        Ok(Self {
            api_url,
            timeout_secs,
            locale: get(LOCALE_ENV).unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            session_path,
        })
    }

    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ConfigError> {
        self.api_url = parse_api_url(api_url)?;
        Ok(self)
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Result<Self, ConfigError> {
        if secs == 0 {
            return Err(ConfigError::InvalidTimeout(secs.to_string()));
        }
        self.timeout_secs = secs;
        Ok(self)
    }

    /// API root without a trailing slash, ready for `format!("{base}{path}")`.
    pub fn base_url(&self) -> &str {
        self.api_url.as_str().trim_end_matches('/')
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidUrl(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(ConfigError::InvalidUrl(raw.to_string())),
    }
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

/// `<data_dir>/adala/session.json`.
pub fn default_session_path() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join("adala").join("session.json"))
        .ok_or(ConfigError::NoDataDir)
}
