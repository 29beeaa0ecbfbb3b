use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{json, Value};
use uuid::Uuid;

use adala_auth::{Role, Session, SessionUser};
use adala_core::{TenantId, UserId};

use crate::error::{ClientError, ClientResult};
use crate::notify::{Confirm, ErrorHandler, Navigator, Notification, Notifier};
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Records every request and answers from a scripted queue.
#[derive(Default)]
pub(crate) struct RecordingTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<ApiResponse>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_json(&self, status: u16, body: Value) {
        self.push_raw(status, serde_json::to_vec(&body).unwrap());
    }

    pub(crate) fn push_raw(&self, status: u16, body: Vec<u8>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(ApiResponse { status, body });
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// `METHOD path` of every request, in order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method.as_str(), r.path))
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ClientError::Network("no scripted response".into()))
    }
}

pub(crate) fn jwt(claims: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.sig")
}

pub(crate) fn test_user(tenant: u128) -> SessionUser {
    SessionUser {
        id: UserId::from_uuid(Uuid::from_u128(7)),
        email: "lawyer@firm.test".into(),
        first_name: Some("سلمى".into()),
        last_name: Some("حداد".into()),
        name: None,
        role: Role::LAWYER,
        tenant_id: Some(TenantId::from_uuid(Uuid::from_u128(tenant))),
        language: Some("ar".into()),
    }
}

pub(crate) fn session_for_tenant(tenant: u128) -> Session {
    Session {
        token: "test-token".into(),
        refresh_token: Some("test-refresh".into()),
        user: test_user(tenant),
        permissions: Vec::new(),
    }
}

/// A session whose token expires far in the future.
pub(crate) fn live_session() -> Session {
    Session {
        token: jwt(json!({ "id": Uuid::from_u128(7).to_string(), "exp": 4_102_444_800_i64 })),
        ..session_for_tenant(1)
    }
}

/// Backend login body: the user flattened next to the tokens.
pub(crate) fn login_body() -> Value {
    json!({
        "id": Uuid::from_u128(7).to_string(),
        "email": "lawyer@firm.test",
        "firstName": "سلمى",
        "lastName": "حداد",
        "role": "lawyer",
        "tenantId": Uuid::from_u128(1).to_string(),
        "language": "ar",
        "token": jwt(json!({ "exp": 4_102_444_800_i64 })),
        "refreshToken": "refresh-1"
    })
}

#[derive(Default)]
pub(crate) struct RecordingNotifier(Mutex<Vec<Notification>>);

impl RecordingNotifier {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn taken(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.0.lock().unwrap().push(notification);
    }
}

#[derive(Default)]
pub(crate) struct RecordingNavigator(Mutex<Vec<String>>);

impl RecordingNavigator {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn routes(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.0.lock().unwrap().push(route.to_string());
    }

    fn current_route(&self) -> Option<String> {
        self.0.lock().unwrap().last().cloned()
    }
}

#[derive(Default)]
pub(crate) struct RecordingErrors(Mutex<Vec<ClientError>>);

impl RecordingErrors {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn errors(&self) -> Vec<ClientError> {
        self.0.lock().unwrap().clone()
    }
}

impl ErrorHandler for RecordingErrors {
    fn handle(&self, err: &ClientError) {
        self.0.lock().unwrap().push(err.clone());
    }
}

/// Answers every prompt the same way and remembers the questions.
pub(crate) struct ScriptedConfirm {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub(crate) fn answering(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, message: &str) -> bool {
        self.prompts.lock().unwrap().push(message.to_string());
        self.answer
    }
}
