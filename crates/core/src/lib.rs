//! `adala-core` — shared building blocks for the Adala practice client.
//!
//! This crate contains **pure** primitives (no HTTP, no IO): identifiers,
//! the error model, the resource contract every record type implements,
//! exact money amounts, pagination envelopes, sort state and field
//! validation.

pub mod error;
pub mod id;
pub mod money;
pub mod pagination;
pub mod resource;
pub mod sort;
pub mod validation;
pub mod wire;

pub use error::{DomainError, DomainResult};
pub use id::{RecordId, TenantId, UserId};
pub use money::Money;
pub use pagination::{Page, PageRequest, Pagination};
pub use resource::{Labeled, Resource, UNKNOWN_LABEL};
pub use sort::{SortDirection, SortState};
pub use validation::{FieldError, FieldErrors};
pub use wire::RecordRef;
