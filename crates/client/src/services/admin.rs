use serde_json::json;
use tracing::info;

use adala_admin::{
    AssignRoleRequest, AuditLog, AuditOption, AuditQuery, AuditSummary, PasswordChange, PermissionRecord, RolePayload, RoleRecord, Tenant,
    TenantPayload, TenantStatus, UserAccount, UserPayload, UserStatus,
};
use adala_core::{Page, PageRequest, RecordId, Resource};

use crate::api::{path_segment, ApiClient};
use crate::error::{ClientError, ClientResult};
use crate::resource::ResourceService;

type Users = ResourceService<UserAccount>;
type Roles = ResourceService<RoleRecord>;
type Tenants = ResourceService<Tenant>;
type AuditLogs = ResourceService<AuditLog>;

/// `/users` of the current tenant.
#[derive(Clone)]
pub struct UserService {
    records: Users,
}

impl UserService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            records: ResourceService::new(api),
        }
    }

    pub fn records(&self) -> &Users {
        &self.records
    }

    pub async fn create(&self, payload: &UserPayload) -> ClientResult<UserAccount> {
        payload.validate(true)?;
        self.records.create(payload).await
    }

    pub async fn update(&self, id: &RecordId, payload: &UserPayload) -> ClientResult<UserAccount> {
        payload.validate(false)?;
        self.records.update(id, payload).await
    }

    /// Activate, suspend... through the regular update endpoint.
    pub async fn change_status(&self, id: &RecordId, status: UserStatus) -> ClientResult<UserAccount> {
        known(status == UserStatus::Unknown)?;
        let updated = self.records.update(id, &json!({ "status": status })).await?;
        info!(id = %id, status = %status, "user status changed");
        Ok(updated)
    }

    /// `PUT /users/:id/password`.
    pub async fn change_password(&self, id: &RecordId, change: &PasswordChange) -> ClientResult<()> {
        change.validate()?;
        self.records
            .api()
            .put::<_, serde_json::Value>(&Users::sub_path(id, "password"), change)
            .await?;
        Ok(())
    }
}

/// `/rbac/*`: roles, permissions and role assignment.
#[derive(Clone)]
pub struct RoleService {
    records: Roles,
}

impl RoleService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            records: ResourceService::new(api),
        }
    }

    pub fn records(&self) -> &Roles {
        &self.records
    }

    pub async fn create(&self, payload: &RolePayload) -> ClientResult<RoleRecord> {
        payload.validate()?;
        self.records.create(payload).await
    }

    pub async fn update(&self, id: &RecordId, payload: &RolePayload) -> ClientResult<RoleRecord> {
        payload.validate()?;
        self.records.update(id, payload).await
    }

    /// Every permission the tenant can grant.
    pub async fn permissions(&self) -> ClientResult<Vec<PermissionRecord>> {
        self.records
            .api()
            .get_rows("/rbac/permissions", Vec::new(), "permissions")
            .await
    }

    pub async fn assign_role(&self, request: &AssignRoleRequest) -> ClientResult<()> {
        self.records
            .api()
            .post::<_, serde_json::Value>("/rbac/assign-role", request)
            .await?;
        info!(user = %request.user_id, role = %request.role_id, "role assigned");
        Ok(())
    }

    pub async fn remove_role(&self, user_id: &RecordId, role_id: &RecordId) -> ClientResult<()> {
        let path = format!("/rbac/users/{user_id}/roles/{role_id}");
        self.records.api().delete(&path).await?;
        info!(user = %user_id, role = %role_id, "role removed");
        Ok(())
    }

    pub async fn role_users(&self, role_id: &RecordId) -> ClientResult<Vec<UserAccount>> {
        self.records
            .api()
            .get_rows(&Roles::sub_path(role_id, "users"), Vec::new(), "users")
            .await
    }
}

/// `/tenants`, super admin only.
#[derive(Clone)]
pub struct TenantService {
    records: Tenants,
}

impl TenantService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            records: ResourceService::new(api),
        }
    }

    pub fn records(&self) -> &Tenants {
        &self.records
    }

    pub async fn create(&self, payload: &TenantPayload) -> ClientResult<Tenant> {
        payload.validate()?;
        self.records.create(payload).await
    }

    pub async fn update(&self, id: &RecordId, payload: &TenantPayload) -> ClientResult<Tenant> {
        payload.validate()?;
        self.records.update(id, payload).await
    }

    pub async fn change_status(&self, id: &RecordId, status: TenantStatus) -> ClientResult<Tenant> {
        known(status == TenantStatus::Unknown)?;
        let updated = self.records.update(id, &json!({ "status": status })).await?;
        info!(id = %id, status = %status, "tenant status changed");
        Ok(updated)
    }

    pub async fn by_subdomain(&self, subdomain: &str) -> ClientResult<Tenant> {
        let path = format!("/tenants/by-subdomain/{}", path_segment(subdomain)?);
        self.records.api().get(&path).await
    }
}

/// `/audit-logs`, read-only.
#[derive(Clone)]
pub struct AuditLogService {
    records: AuditLogs,
}

impl AuditLogService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            records: ResourceService::new(api),
        }
    }

    pub fn records(&self) -> &AuditLogs {
        &self.records
    }

    /// One page of entries matching `query`.
    pub async fn search(&self, query: &AuditQuery, page: &PageRequest) -> ClientResult<Page<AuditLog>> {
        let mut pairs = page.query_pairs();
        pairs.extend(query.query_pairs());
        let body = self.records.api().get_value(AuditLog::PATH, pairs).await?;
        Ok(Page::from_envelope(body, AuditLog::COLLECTION_KEY)?)
    }

    pub async fn summary(&self, query: &AuditQuery) -> ClientResult<AuditSummary> {
        self.records
            .api()
            .get_with_query("/audit-logs/stats/summary", query.query_pairs())
            .await
    }

    pub async fn action_options(&self) -> ClientResult<Vec<AuditOption>> {
        self.options("actions").await
    }

    pub async fn entity_type_options(&self) -> ClientResult<Vec<AuditOption>> {
        self.options("entity-types").await
    }

    async fn options(&self, kind: &str) -> ClientResult<Vec<AuditOption>> {
        let path = format!("/audit-logs/options/{kind}");
        self.records.api().get_rows(&path, Vec::new(), "options").await
    }
}

fn known(is_unknown: bool) -> ClientResult<()> {
    if is_unknown {
        Err(ClientError::InvalidState("cannot set an unknown status".into()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;

    #[tokio::test]
    async fn role_assignment_paths() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "success": true }));
        transport.push_raw(204, Vec::new());
        let roles = RoleService::new(ApiClient::new(transport.clone()));
        let user = RecordId::new("u1").unwrap();
        let role = RecordId::new("r2").unwrap();

        roles
            .assign_role(&AssignRoleRequest {
                user_id: user.clone(),
                role_id: role.clone(),
            })
            .await
            .unwrap();
        roles.remove_role(&user, &role).await.unwrap();

        assert_eq!(
            transport.calls(),
            ["POST /rbac/assign-role", "DELETE /rbac/users/u1/roles/r2"]
        );
        assert_eq!(
            transport.requests()[0].body,
            Some(json!({ "userId": "u1", "roleId": "r2" }))
        );
    }

    #[tokio::test]
    async fn user_status_goes_through_update() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "id": "u1", "email": "a@b.test", "status": "suspended" }));
        let users = UserService::new(ApiClient::new(transport.clone()));

        let user = users
            .change_status(&RecordId::new("u1").unwrap(), UserStatus::Suspended)
            .await
            .unwrap();
        assert_eq!(user.status, UserStatus::Suspended);
        assert_eq!(transport.calls(), ["PUT /users/u1"]);
        assert_eq!(transport.requests()[0].body, Some(json!({ "status": "suspended" })));

        assert!(users
            .change_status(&RecordId::new("u1").unwrap(), UserStatus::Unknown)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn short_password_is_not_sent() {
        let transport = RecordingTransport::new();
        let users = UserService::new(ApiClient::new(transport.clone()));
        let change = PasswordChange {
            password: "short".into(),
        };
        assert!(matches!(
            users.change_password(&RecordId::new("u1").unwrap(), &change).await,
            Err(ClientError::Validation(_))
        ));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn audit_search_merges_page_and_filters() {
        let transport = RecordingTransport::new();
        transport.push_json(
            200,
            json!({
                "success": true,
                "data": [{ "id": "a1", "action": "DELETE", "entity_type": "CASE", "severity": "HIGH" }],
                "pagination": { "total": 41, "page": 2, "limit": 20, "total_pages": 3 }
            }),
        );
        let audit = AuditLogService::new(ApiClient::new(transport.clone()));
        let query = AuditQuery {
            action: Some("DELETE".into()),
            ..AuditQuery::default()
        };

        let page = audit.search(&query, &PageRequest::new(2, 20)).await.unwrap();
        assert_eq!(page.items[0].display_name(), "DELETE CASE");
        assert_eq!(page.total(), 41);
        assert_eq!(page.pagination.pages, 3);

        let sent = &transport.requests()[0];
        assert_eq!(sent.path, "/audit-logs");
        assert!(sent.query.contains(&("page".to_string(), "2".to_string())));
        assert!(sent.query.contains(&("action".to_string(), "DELETE".to_string())));
    }

    #[tokio::test]
    async fn audit_summary_unwraps_data() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "success": true, "data": { "total_count": 7 } }));
        let audit = AuditLogService::new(ApiClient::new(transport.clone()));

        let summary = audit.summary(&AuditQuery::default()).await.unwrap();
        assert_eq!(summary.total_count, 7);
        assert_eq!(transport.calls(), ["GET /audit-logs/stats/summary"]);
    }
}
