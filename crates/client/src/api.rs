//! Typed JSON calls over a [`Transport`], carrying the current session.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use adala_auth::Session;
use adala_core::pagination::decode_rows;
use adala_core::FieldErrors;

use crate::error::{ClientError, ClientResult};
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

/// Shared handle to the backend. Clones share the transport and the session.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Arc<RwLock<Option<Session>>>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            session: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn set_session(&self, session: Session) {
        *self.session.write().await = Some(session);
    }

    pub async fn clear_session(&self) -> Option<Session> {
        self.session.write().await.take()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.get_with_query(path, Vec::new()).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> ClientResult<T> {
        let req = ApiRequest::new(Method::Get, path).with_query(query);
        decode_item(self.call(req, true).await?)
    }

    /// The raw JSON body, for envelopes decoded by the caller.
    pub async fn get_value(&self, path: &str, query: Vec<(String, String)>) -> ClientResult<Value> {
        let req = ApiRequest::new(Method::Get, path).with_query(query);
        json_body(&self.call(req, true).await?)
    }

    /// An unpaginated sub-collection (sessions, payments, versions...).
    pub async fn get_rows<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
        collection_key: &str,
    ) -> ClientResult<Vec<T>> {
        let body = self.get_value(path, query).await?;
        Ok(decode_rows(body, collection_key)?)
    }

    pub async fn get_bytes(&self, path: &str) -> ClientResult<Vec<u8>> {
        let resp = self.call(ApiRequest::new(Method::Get, path), true).await?;
        Ok(resp.body)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::Post, path, body, true).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::Put, path, body, true).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::Patch, path, body, true).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.call(ApiRequest::new(Method::Delete, path), true)
            .await
            .map(|_| ())
    }

    /// POST without session headers (login, two-factor, password reset).
    pub async fn post_anonymous<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::Post, path, body, false).await
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        authenticated: bool,
    ) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)
            .map_err(|e| ClientError::Parse(format!("request body: {e}")))?;
        let req = ApiRequest::new(method, path).with_body(body);
        decode_item(self.call(req, authenticated).await?)
    }

    async fn call(&self, mut req: ApiRequest, authenticated: bool) -> ClientResult<ApiResponse> {
        if authenticated {
            if let Some(session) = self.session.read().await.as_ref() {
                req.bearer = Some(session.token.clone());
                req.tenant_id = session.tenant_id().map(|t| t.to_string());
            }
        }

        let method = req.method;
        let path = req.path.clone();
        debug!(method = method.as_str(), path = %path, "api request");

        let resp = self.transport.send(req).await.inspect_err(|e| {
            warn!(method = method.as_str(), path = %path, error = %e, "api request failed");
        })?;

        if resp.is_success() {
            return Ok(resp);
        }

        let message = error_message(&resp);
        warn!(
            method = method.as_str(),
            path = %path,
            status = resp.status,
            "api error response"
        );
        Err(ClientError::api(resp.status, message))
    }
}

fn json_body(resp: &ApiResponse) -> ClientResult<Value> {
    if resp.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&resp.body).map_err(|e| ClientError::Parse(e.to_string()))
}

/// Decode a single-item body: its `data` field when it has one and that
/// decodes, else the bare object.
fn decode_item<T: DeserializeOwned>(resp: ApiResponse) -> ClientResult<T> {
    let body = json_body(&resp)?;
    if let Some(data) = body.get("data") {
        if let Ok(item) = <T as serde::Deserialize>::deserialize(data) {
            return Ok(item);
        }
    }
    serde_json::from_value(body).map_err(|e| ClientError::Parse(e.to_string()))
}

/// Percent-encodes free text (a department, a subdomain, a reset token) as
/// exactly one path segment.
pub fn path_segment(raw: &str) -> ClientResult<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.chars().all(|c| c == '.') {
        let mut errors = FieldErrors::new();
        errors.push("path", format!("'{raw}' is not a path segment"));
        return Err(errors.into());
    }
    // form encoding writes spaces as '+', and a literal '+' as %2B
    let encoded: String = url::form_urlencoded::byte_serialize(raw.as_bytes()).collect();
    Ok(encoded.replace('+', "%20"))
}

/// `message`, then `error`, then the raw text of an error body.
fn error_message(resp: &ApiResponse) -> String {
    let text = String::from_utf8_lossy(&resp.body);
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => ["message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| text.trim().to_string()),
        _ => text.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{session_for_tenant, RecordingTransport};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[tokio::test]
    async fn attaches_bearer_and_tenant_when_signed_in() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "name": "a" }));
        let api = ApiClient::new(transport.clone());
        api.set_session(session_for_tenant(3)).await;

        let named: Named = api.get("/things/1").await.unwrap();
        assert_eq!(named.name, "a");

        let sent = transport.requests();
        assert_eq!(sent[0].bearer.as_deref(), Some("test-token"));
        assert_eq!(
            sent[0].tenant_id.as_deref(),
            Some("00000000-0000-0000-0000-000000000003")
        );
    }

    #[tokio::test]
    async fn anonymous_posts_carry_no_session_headers() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({}));
        let api = ApiClient::new(transport.clone());
        api.set_session(session_for_tenant(3)).await;

        let _: Value = api.post_anonymous("/auth/login", &json!({})).await.unwrap();
        let sent = transport.requests();
        assert_eq!(sent[0].bearer, None);
        assert_eq!(sent[0].tenant_id, None);
    }

    #[tokio::test]
    async fn unwraps_data_field_for_single_items() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "success": true, "data": { "name": "b" } }));
        let api = ApiClient::new(transport);
        let named: Named = api.get("/things/2").await.unwrap();
        assert_eq!(named, Named { name: "b".into() });
    }

    #[tokio::test]
    async fn error_bodies_are_classified() {
        let transport = RecordingTransport::new();
        transport.push_json(401, json!({ "message": "jwt expired" }));
        transport.push_json(409, json!({ "error": "duplicate" }));
        transport.push_raw(502, b"bad gateway".to_vec());
        let api = ApiClient::new(transport);

        assert_eq!(
            api.get::<Value>("/a").await.unwrap_err(),
            ClientError::Unauthorized("jwt expired".into())
        );
        assert_eq!(
            api.get::<Value>("/b").await.unwrap_err(),
            ClientError::Api { status: 409, message: "duplicate".into() }
        );
        assert_eq!(
            api.delete("/c").await.unwrap_err(),
            ClientError::Api { status: 502, message: "bad gateway".into() }
        );
    }

    #[tokio::test]
    async fn empty_bodies_decode_as_null() {
        let transport = RecordingTransport::new();
        transport.push_raw(204, Vec::new());
        let api = ApiClient::new(transport);
        let value: Value = api.post("/x", &json!({})).await.unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn free_text_is_encoded_as_one_segment() {
        assert_eq!(path_segment(" الموارد البشرية ").unwrap(), "%D8%A7%D9%84%D9%85%D9%88%D8%A7%D8%B1%D8%AF%20%D8%A7%D9%84%D8%A8%D8%B4%D8%B1%D9%8A%D8%A9");
        assert_eq!(path_segment("a/b?c#d+e").unwrap(), "a%2Fb%3Fc%23d%2Be");
        assert_eq!(path_segment("tok-en_1.2").unwrap(), "tok-en_1.2");
        assert!(path_segment("..").is_err());
        assert!(path_segment("  ").is_err());
    }
}
