//! One service per backend area. Each wraps a [`ResourceService`] for the
//! plain CRUD and adds the area's extra endpoints.
//!
//! [`ResourceService`]: crate::resource::ResourceService

pub mod admin;
pub mod auth;
pub mod cases;
pub mod clients;
pub mod consultations;
pub mod contracts;
pub mod documents;
pub mod hr;
pub mod tasks;
pub mod timetracking;

pub use admin::{AuditLogService, RoleService, TenantService, UserService};
pub use auth::AuthService;
pub use cases::{CalendarService, CaseService};
pub use clients::ClientService;
pub use consultations::ConsultationService;
pub use contracts::ContractService;
pub use documents::DocumentService;
pub use hr::{EmployeeService, LeaveService};
pub use tasks::TaskService;
pub use timetracking::TimeEntryService;
