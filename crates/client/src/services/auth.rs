use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use adala_auth::{LoginForm, LoginResponse, Session, SessionUser, TwoFactorForm, TwoFactorRequest};
use adala_core::validation::{is_password_long_enough, is_valid_email};
use adala_core::FieldErrors;

use crate::api::{path_segment, ApiClient};
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// `/auth/*` endpoints.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// `POST /auth/login`. No tenant header: the account number names the
    /// tenant.
    pub async fn login(&self, form: &LoginForm) -> ClientResult<LoginResponse> {
        self.api.post_anonymous("/auth/login", &form.to_request()).await
    }

    /// `POST /auth/verify-2fa` with the temporary token from the login step.
    pub async fn verify_two_factor(
        &self,
        form: &TwoFactorForm,
        two_factor_token: Option<&str>,
    ) -> ClientResult<LoginResponse> {
        let body = TwoFactorRequest {
            code: form.code.trim(),
            two_factor_token,
        };
        self.api.post_anonymous("/auth/verify-2fa", &body).await
    }

    /// Tell the backend, then drop the local session whatever it answered.
    pub async fn logout(&self) -> ClientResult<()> {
        if self.api.session().await.is_some() {
            if let Err(err) = self.api.post::<_, Value>("/auth/logout", &json!({})).await {
                warn!(error = %err, "logout request failed; clearing session anyway");
            }
        }
        self.api.clear_session().await;
        info!("signed out");
        Ok(())
    }

    /// Trade the refresh token for new tokens and store them in the session.
    pub async fn refresh_token(&self) -> ClientResult<Session> {
        let session = self
            .api
            .session()
            .await
            .ok_or_else(|| ClientError::Unauthorized("no session to refresh".into()))?;
        let refresh = session
            .refresh_token
            .clone()
            .ok_or_else(|| ClientError::Unauthorized("session has no refresh token".into()))?;

        let resp: RefreshResponse = self
            .api
            .post_anonymous("/auth/refresh-token", &json!({ "refreshToken": refresh }))
            .await?;
        let session = session.with_tokens(resp.token, resp.refresh_token);
        self.api.set_session(session.clone()).await;
        info!("session tokens refreshed");
        Ok(session)
    }

    pub async fn forgot_password(&self, email: &str) -> ClientResult<()> {
        let email = email.trim();
        if !is_valid_email(email) {
            let mut errors = FieldErrors::new();
            errors.push("email", "invalid email address");
            return Err(errors.into());
        }
        self.api
            .post_anonymous::<_, Value>("/auth/forgot-password", &json!({ "email": email }))
            .await?;
        Ok(())
    }

    /// `POST /auth/reset-password/:token`.
    pub async fn reset_password(&self, token: &str, password: &str) -> ClientResult<()> {
        let mut errors = FieldErrors::new();
        let segment = path_segment(token);
        if segment.is_err() {
            errors.push("token", "invalid reset token");
        }
        if !is_password_long_enough(password) {
            errors.push("password", "must be at least 8 characters");
        }
        errors.into_result()?;

        let path = format!("/auth/reset-password/{}", segment?);
        self.api
            .post_anonymous::<_, Value>(&path, &json!({ "password": password }))
            .await?;
        Ok(())
    }

    /// `GET /auth/me`.
    pub async fn current_user(&self) -> ClientResult<SessionUser> {
        self.api.get("/auth/me").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{login_body, session_for_tenant, RecordingTransport};

    #[tokio::test]
    async fn login_posts_camel_case_credentials() {
        let transport = RecordingTransport::new();
        transport.push_json(200, login_body());
        let auth = AuthService::new(ApiClient::new(transport.clone()));

        let form = LoginForm::new("123456", "lawyer@firm.test", "s3cret-pass").remember_me(true);
        let resp = auth.login(&form).await.unwrap();
        assert!(resp.into_session().is_ok());

        let sent = &transport.requests()[0];
        assert_eq!(sent.path, "/auth/login");
        let body = sent.body.as_ref().unwrap();
        assert_eq!(body["tenantAccountNumber"], "123456");
        assert_eq!(body["rememberMe"], true);
        assert_eq!(sent.tenant_id, None);
    }

    #[tokio::test]
    async fn refresh_replaces_tokens() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "token": "new-token", "refreshToken": "new-refresh" }));
        let api = ApiClient::new(transport.clone());
        api.set_session(session_for_tenant(1)).await;
        let auth = AuthService::new(api.clone());

        let session = auth.refresh_token().await.unwrap();
        assert_eq!(session.token, "new-token");
        assert_eq!(api.session().await.unwrap().refresh_token.as_deref(), Some("new-refresh"));
        assert_eq!(
            transport.requests()[0].body.as_ref().unwrap()["refreshToken"],
            "test-refresh"
        );
    }

    #[tokio::test]
    async fn logout_clears_session_even_when_backend_fails() {
        let transport = RecordingTransport::new();
        transport.push_json(500, json!({ "message": "down" }));
        let api = ApiClient::new(transport.clone());
        api.set_session(session_for_tenant(1)).await;

        AuthService::new(api.clone()).logout().await.unwrap();
        assert!(api.session().await.is_none());
        assert_eq!(transport.calls(), ["POST /auth/logout"]);
    }

    #[tokio::test]
    async fn password_flows_validate_before_sending() {
        let transport = RecordingTransport::new();
        let auth = AuthService::new(ApiClient::new(transport.clone()));

        assert!(matches!(
            auth.forgot_password("not-an-email").await,
            Err(ClientError::Validation(_))
        ));
        assert!(matches!(
            auth.reset_password("tok", "short").await,
            Err(ClientError::Validation(f)) if f.contains("password")
        ));
        assert!(transport.calls().is_empty());

        transport.push_raw(200, Vec::new());
        auth.reset_password("tok-1", "long-enough").await.unwrap();
        assert_eq!(transport.calls(), ["POST /auth/reset-password/tok-1"]);
    }

    #[tokio::test]
    async fn reset_token_stays_inside_its_segment() {
        let transport = RecordingTransport::new();
        let auth = AuthService::new(ApiClient::new(transport.clone()));

        assert!(matches!(
            auth.reset_password("..", "long-enough").await,
            Err(ClientError::Validation(f)) if f.contains("token")
        ));
        transport.push_raw(200, Vec::new());
        auth.reset_password("a/b?c#d", "long-enough").await.unwrap();
        assert_eq!(transport.calls(), ["POST /auth/reset-password/a%2Fb%3Fc%23d"]);
    }
}
