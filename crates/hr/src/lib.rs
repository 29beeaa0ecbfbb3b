//! Human resources: the employee directory under `/hr/employees` and leave
//! requests under `/hr/leaves`.

pub mod employee;
pub mod leave;

pub use employee::{
    ContractType, Employee, EmployeePayload, EmploymentStatus, Gender, DEFAULT_ENDING_SOON_DAYS,
};
pub use leave::{Leave, LeavePayload, LeaveRejection, LeaveStatus, MIN_LEAVE_DAYS};
