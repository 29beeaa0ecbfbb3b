use serde::{Deserialize, Serialize};

use adala_auth::Permission;
use adala_core::validation::require_text;
use adala_core::{FieldErrors, RecordId, Resource};

/// Role reference embedded in user rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSummary {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A grantable permission (`/rbac/permissions`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    pub id: RecordId,
    pub code: Permission,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
}

/// A tenant role with its permissions (`/rbac/roles`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// System roles are seeded by the backend and cannot be deleted.
    #[serde(default)]
    pub is_system_role: bool,
    #[serde(default)]
    pub permissions: Vec<PermissionRecord>,
}

impl RoleRecord {
    pub fn grants(&self, required: &Permission) -> bool {
        self.permissions.iter().any(|p| p.code.grants(required))
    }

    /// Permission ids grouped by module, in first-seen order.
    pub fn permissions_by_module(&self) -> Vec<(&str, Vec<&PermissionRecord>)> {
        let mut groups: Vec<(&str, Vec<&PermissionRecord>)> = Vec::new();
        for perm in &self.permissions {
            let module = perm.module.as_deref().unwrap_or("");
            match groups.iter_mut().find(|(m, _)| *m == module) {
                Some((_, list)) => list.push(perm),
                None => groups.push((module, vec![perm])),
            }
        }
        groups
    }
}

impl Resource for RoleRecord {
    const PATH: &'static str = "/rbac/roles";
    const COLLECTION_KEY: &'static str = "roles";
    const LABEL: &'static str = "الدور";
    const PLURAL_LABEL: &'static str = "الأدوار";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

/// Body of `POST /rbac/roles` and `PUT /rbac/roles/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RolePayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Permission ids to grant.
    pub permissions: Vec<RecordId>,
}

impl RolePayload {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "name", &self.name);
        let mut seen = std::collections::HashSet::new();
        if !self.permissions.iter().all(|p| seen.insert(p)) {
            errors.push("permissions", "duplicate permission");
        }
        errors.into_result()
    }
}

/// Body of `POST /rbac/assign-role`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    pub user_id: RecordId,
    pub role_id: RecordId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn role() -> RoleRecord {
        serde_json::from_value(json!({
            "id": "r1",
            "name": "محامي أول",
            "permissions": [
                { "id": "p1", "code": "cases:read", "name": "عرض القضايا", "module": "cases" },
                { "id": "p2", "code": "users:read", "name": "عرض المستخدمين", "module": "users" },
                { "id": "p3", "code": "cases:update", "name": "تعديل القضايا", "module": "cases" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn grants_checks_permission_codes() {
        let role = role();
        assert!(role.grants(&Permission::new("cases:update")));
        assert!(!role.grants(&Permission::new("cases:delete")));
        assert!(!role.is_system_role);
    }

    #[test]
    fn groups_by_module_in_order() {
        let role = role();
        let groups = role.permissions_by_module();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "cases");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "users");
    }

    #[test]
    fn payload_rejects_duplicates() {
        let id = |s: &str| RecordId::new(s).unwrap();
        let payload = RolePayload {
            name: "مراجع".into(),
            description: None,
            permissions: vec![id("p1"), id("p1")],
        };
        assert!(payload.validate().unwrap_err().contains("permissions"));
    }

    #[test]
    fn assign_request_is_camel_case() {
        let req = AssignRoleRequest {
            user_id: RecordId::new("u1").unwrap(),
            role_id: RecordId::new("r1").unwrap(),
        };
        assert_eq!(serde_json::to_value(req).unwrap(), json!({ "userId": "u1", "roleId": "r1" }));
    }
}
