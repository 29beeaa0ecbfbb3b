use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adala_core::{TenantId, UserId};

use crate::claims;
use crate::{Permission, Role};

fn default_role() -> Role {
    Role::USER
}

/// The signed-in user as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    #[serde(default)]
    pub language: Option<String>,
}

impl SessionUser {
    /// `name`, else first and last name, else the email address.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.trim().to_string();
        }
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.email.clone()
        } else {
            full
        }
    }
}

/// An authenticated session: tokens plus the user they belong to.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: SessionUser,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .field("permissions", &self.permissions)
            .finish()
    }
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        claims::is_expired(&self.token, now)
    }

    /// Authenticated and not expired at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.is_authenticated() && !self.is_expired(now)
    }

    /// Tenant the session acts in: the user's tenant, else the token's.
    pub fn tenant_id(&self) -> Option<TenantId> {
        self.user.tenant_id.or_else(|| {
            claims::decode_unverified(&self.token)
                .ok()
                .and_then(|c| c.tenant_id)
        })
    }

    pub fn has_role(&self, role: &Role) -> bool {
        &self.user.role == role
    }

    pub fn has_permission(&self, required: &Permission) -> bool {
        self.permissions.iter().any(|p| p.grants(required))
    }

    pub fn display_name(&self) -> String {
        self.user.display_name()
    }

    /// Replace the tokens after a refresh, keeping the user.
    pub fn with_tokens(mut self, token: String, refresh_token: Option<String>) -> Self {
        self.token = token;
        if refresh_token.is_some() {
            self.refresh_token = refresh_token;
        }
        self
    }
}

#[cfg(test)]
pub(crate) fn test_user() -> SessionUser {
    use uuid::Uuid;
    SessionUser {
        id: UserId::from_uuid(Uuid::from_u128(7)),
        email: "lawyer@firm.test".to_string(),
        first_name: Some("Salma".to_string()),
        last_name: Some("Haddad".to_string()),
        name: None,
        role: Role::LAWYER,
        tenant_id: Some(TenantId::from_uuid(Uuid::from_u128(1))),
        language: Some("ar".to_string()),
    }
}
