//! `adala-auth` — client-side authentication and authorization.
//!
//! Decoupled from HTTP: this crate validates login forms, drives the
//! login / two-factor state machine, inspects session tokens and answers
//! role and permission questions for screen guards. Token issuance and
//! enforcement stay on the server.

pub mod claims;
pub mod credentials;
pub mod login;
pub mod permissions;
pub mod roles;
pub mod session;

pub use claims::{decode_unverified, TokenClaims, TokenError};
pub use credentials::{LoginForm, LoginRequest, TwoFactorForm, TwoFactorRequest};
pub use login::{LoginFlow, LoginRejected, LoginResponse, LoginState, LoginStep, DEFAULT_RETURN_URL};
pub use permissions::Permission;
pub use roles::Role;
pub use session::{Session, SessionUser};
