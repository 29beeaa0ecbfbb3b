//! Legal cases, their court sessions and the practice calendar.
//!
//! Records as served by `/cases`, `/cases/:id/sessions` and
//! `/calendar/events`, with the payloads used to create or update them.
//! No IO: the client crate issues the requests.

pub mod calendar;
pub mod case;
pub mod session;

pub use calendar::{CalendarEvent, EventPayload, EventType};
pub use case::{CaseDocument, CasePayload, CaseStatus, LegalCase};
pub use session::{CaseSession, CaseSessionPayload};
