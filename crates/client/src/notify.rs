//! Collaborators the screen controllers report to.
//!
//! A front end plugs in its own toasts, router and dialogs; the `Log*`
//! implementations here only write to the tracing log.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::ClientError;

pub const DEFAULT_DURATION_MS: u64 = 3000;
pub const ERROR_DURATION_MS: u64 = 5000;

/// Route shown after a logout or an expired session.
pub const LOGIN_ROUTE: &str = "/login";
pub const FORBIDDEN_ROUTE: &str = "/unauthorized";
pub const NOT_FOUND_ROUTE: &str = "/not-found";
pub const ERROR_ROUTE: &str = "/error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

/// A transient message (toast / snackbar).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    /// Text or message key.
    pub message: String,
    pub description: Option<String>,
    pub duration_ms: u64,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
            description: None,
            duration_ms: DEFAULT_DURATION_MS,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
            description: None,
            duration_ms: ERROR_DURATION_MS,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Localized key of the error, with the backend's message as the
    /// description when it sent one.
    pub fn from_error(err: &ClientError) -> Self {
        let note = Self::error(err.message_key());
        match err.server_message() {
            Some(message) => note.with_description(message),
            None => note,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Receives every failure a controller does not render inline.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, err: &ClientError);
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);

    /// Route currently shown, when the front end tracks one.
    fn current_route(&self) -> Option<String> {
        None
    }
}

/// Yes/no prompt shown before destructive actions.
pub trait Confirm: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, n: Notification) {
        let description = n.description.as_deref().unwrap_or_default();
        match n.kind {
            NotificationKind::Success | NotificationKind::Info => {
                info!(text = %n.message, description, "notification")
            }
            NotificationKind::Warning => warn!(text = %n.message, description, "notification"),
            NotificationKind::Error => error!(text = %n.message, description, "notification"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: &str) {
        info!(route, "navigate");
    }
}

/// Notifies every error, then routes by status: an expired session goes
/// to the login route (keeping the current route as `returnUrl`), 403 to
/// [`FORBIDDEN_ROUTE`], 404 to [`NOT_FOUND_ROUTE`] and 500 to
/// [`ERROR_ROUTE`]. Refused credentials stay where they are.
#[derive(Clone)]
pub struct NotifyingErrorHandler {
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl NotifyingErrorHandler {
    pub fn new(notifier: Arc<dyn Notifier>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            notifier,
            navigator,
        }
    }
}

impl ErrorHandler for NotifyingErrorHandler {
    fn handle(&self, err: &ClientError) {
        warn!(error = %err, key = err.message_key(), "request failed");
        self.notifier.notify(Notification::from_error(err));
        if let Some(route) = self.redirect_for(err) {
            self.navigator.navigate(&route);
        }
    }
}

impl NotifyingErrorHandler {
    fn redirect_for(&self, err: &ClientError) -> Option<String> {
        match err {
            ClientError::Unauthorized(_) => {
                let current = self.navigator.current_route();
                match current.as_deref() {
                    Some(route) if route.contains(LOGIN_ROUTE) => None,
                    Some(route) => Some(login_route_returning_to(route)),
                    None => Some(LOGIN_ROUTE.to_string()),
                }
            }
            ClientError::Api { status: 403, .. } => Some(FORBIDDEN_ROUTE.to_string()),
            ClientError::Api { status: 404, .. } => Some(NOT_FOUND_ROUTE.to_string()),
            ClientError::Api { status: 500, .. } => Some(ERROR_ROUTE.to_string()),
            _ => None,
        }
    }
}

/// `/login?returnUrl=<route>`.
pub fn login_route_returning_to(route: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("returnUrl", route)
        .finish();
    format!("{LOGIN_ROUTE}?{query}")
}
