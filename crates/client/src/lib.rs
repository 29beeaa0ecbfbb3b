//! `adala-client` — the Adala practice API from Rust.
//!
//! Layers, bottom up:
//! - [`transport`]: one HTTP exchange (reqwest in production).
//! - [`api`]: typed JSON calls carrying the session's bearer token and
//!   tenant header.
//! - [`resource`] and [`services`]: CRUD per record family plus each
//!   area's extra endpoints.
//! - [`screens`]: headless login and list controllers that report through
//!   the [`notify`] seams.
//!
//! [`AdalaClient`] wires them together from a [`ClientConfig`].

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod resource;
pub mod screens;
pub mod services;
pub mod session_store;
pub mod transport;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

pub use api::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, ClientResult};
pub use notify::{
    Confirm, ErrorHandler, LogNavigator, LogNotifier, Navigator, Notification, NotificationKind,
    Notifier, NotifyingErrorHandler,
};
pub use resource::ResourceService;
pub use screens::{Collaborators, DeleteOutcome, ListScreen, LoginScreen};
pub use session_store::SessionStore;
pub use transport::{ApiRequest, ApiResponse, Method, ReqwestTransport, Transport};

use services::{
    AuditLogService, AuthService, CalendarService, CaseService, ClientService,
    ConsultationService, ContractService, DocumentService, EmployeeService, LeaveService,
    RoleService, TaskService, TenantService, TimeEntryService, UserService,
};

/// Entry point: one session shared by every service handed out.
#[derive(Clone)]
pub struct AdalaClient {
    api: ApiClient,
    store: SessionStore,
}

impl AdalaClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            api: ApiClient::new(transport),
            store: SessionStore::new(config.session_path.clone()),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.store
    }

    /// Pick up a remembered session. Expired ones are removed from disk.
    pub async fn restore_session(&self) -> anyhow::Result<bool> {
        let Some(session) = self.store.load()? else {
            debug!("no remembered session");
            return Ok(false);
        };
        if !session.is_valid_at(Utc::now()) {
            info!("remembered session has expired");
            self.store.clear()?;
            return Ok(false);
        }
        info!(user = %session.user.id, "session restored");
        self.api.set_session(session).await;
        Ok(true)
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone())
    }

    pub fn cases(&self) -> CaseService {
        CaseService::new(self.api.clone())
    }

    pub fn calendar(&self) -> CalendarService {
        CalendarService::new(self.api.clone())
    }

    pub fn clients(&self) -> ClientService {
        ClientService::new(self.api.clone())
    }

    pub fn contracts(&self) -> ContractService {
        ContractService::new(self.api.clone())
    }

    pub fn documents(&self) -> DocumentService {
        DocumentService::new(self.api.clone())
    }

    pub fn consultations(&self) -> ConsultationService {
        ConsultationService::new(self.api.clone())
    }

    pub fn employees(&self) -> EmployeeService {
        EmployeeService::new(self.api.clone())
    }

    pub fn leaves(&self) -> LeaveService {
        LeaveService::new(self.api.clone())
    }

    pub fn tasks(&self) -> TaskService {
        TaskService::new(self.api.clone())
    }

    pub fn time_entries(&self) -> TimeEntryService {
        TimeEntryService::new(self.api.clone())
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.api.clone())
    }

    pub fn roles(&self) -> RoleService {
        RoleService::new(self.api.clone())
    }

    pub fn tenants(&self) -> TenantService {
        TenantService::new(self.api.clone())
    }

    pub fn audit_logs(&self) -> AuditLogService {
        AuditLogService::new(self.api.clone())
    }

    /// A list screen over any resource, sharing this client's session.
    pub fn list_screen<R: adala_core::Resource>(&self, collaborators: Collaborators) -> ListScreen<R> {
        ListScreen::new(ResourceService::new(self.api.clone()), collaborators)
    }

    pub async fn login_screen(&self, collaborators: Collaborators, return_url: Option<&str>) -> LoginScreen {
        LoginScreen::open(self.auth(), collaborators, Some(self.store.clone()), return_url).await
    }
}
