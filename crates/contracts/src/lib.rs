//! Contracts, their payment schedule, templates and version history.

pub mod contract;
pub mod payment;
pub mod template;

pub use contract::{Contract, ContractPayload, ContractStatus, ContractVersion, DEFAULT_CURRENCY};
pub use payment::{ContractPayment, PaymentPayload, PaymentStatus};
pub use template::ContractTemplate;
