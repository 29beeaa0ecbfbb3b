//! Client (customer) records served under `/clients`.

pub mod client;

pub use client::{Client, ClientPayload, ClientStatus, ClientType};
