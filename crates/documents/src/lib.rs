//! Document records, version history, categories and share links.

pub mod document;
pub mod share;

pub use document::{Document, DocumentCategory, DocumentStatus, DocumentUpdate, DocumentVersion};
pub use share::{ShareLink, ShareSettings};
