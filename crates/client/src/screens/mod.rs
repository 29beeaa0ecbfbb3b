//! Headless screen controllers.
//!
//! A controller owns the state a screen renders (rows, flags, inline error)
//! and reports side effects through the [`Collaborators`] it was given.

pub mod list;
pub mod login;

use std::sync::Arc;

pub use list::{DeleteOutcome, ListScreen};
pub use login::{sign_out, LoginScreen};

use crate::notify::{
    Confirm, ErrorHandler, LogNavigator, LogNotifier, Navigator, Notifier, NotifyingErrorHandler,
};

/// The side-effect seams a front end supplies.
#[derive(Clone)]
pub struct Collaborators {
    pub notifier: Arc<dyn Notifier>,
    pub errors: Arc<dyn ErrorHandler>,
    pub navigator: Arc<dyn Navigator>,
    pub confirm: Arc<dyn Confirm>,
}

impl Collaborators {
    /// Notifications and navigation go to the log; only prompts are real.
    pub fn logging(confirm: Arc<dyn Confirm>) -> Self {
        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
        let navigator: Arc<dyn Navigator> = Arc::new(LogNavigator);
        Self {
            errors: Arc::new(NotifyingErrorHandler::new(notifier.clone(), navigator.clone())),
            notifier,
            navigator,
            confirm,
        }
    }
}
