use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used for RBAC.
///
/// Roles are opaque strings: tenants can define their own, and the admin
/// screens manage them. Only the built-in roles have a display label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));
    pub const MANAGER: Role = Role(Cow::Borrowed("manager"));
    pub const LAWYER: Role = Role(Cow::Borrowed("lawyer"));
    pub const ASSISTANT: Role = Role(Cow::Borrowed("assistant"));
    pub const USER: Role = Role(Cow::Borrowed("user"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Arabic display text; custom roles show their raw name.
    pub fn label(&self) -> &str {
        match self.as_str() {
            "admin" => "مدير",
            "manager" => "مشرف",
            "lawyer" => "محامي",
            "assistant" => "مساعد",
            "user" => "مستخدم",
            other => other,
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
