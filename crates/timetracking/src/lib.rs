//! Billable time: entries under `/timetracking/time-entries` and the
//! per-user summary report.

pub mod entry;
pub mod summary;

pub use entry::{BillingStatus, TimeEntry, TimeEntryPayload};
pub use summary::{SummaryQuery, TimeSummary};
