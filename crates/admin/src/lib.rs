//! Administration records: user accounts, roles with their permissions,
//! tenants and the audit trail.

pub mod audit;
pub mod role;
pub mod tenant;
pub mod user;

pub use audit::{
    AuditLog, AuditOption, AuditQuery, AuditSeverity, AuditStatus, AuditSummary, GroupCount,
};
pub use role::{AssignRoleRequest, PermissionRecord, RolePayload, RoleRecord, RoleSummary};
pub use tenant::{Tenant, TenantPayload, TenantStatus};
pub use user::{PasswordChange, UserAccount, UserPayload, UserStatus};
