//! Login and two-factor screen.

use chrono::Utc;
use tracing::{info, warn};

use adala_auth::{LoginFlow, LoginForm, LoginResponse, LoginStep, TwoFactorForm, DEFAULT_RETURN_URL};
use adala_core::DomainResult;

use crate::error::{ClientError, ClientResult};
use crate::notify::{Notification, DEFAULT_DURATION_MS, LOGIN_ROUTE};
use crate::screens::Collaborators;
use crate::services::AuthService;
use crate::session_store::SessionStore;

const SIGNED_IN: &str = "تم تسجيل الدخول بنجاح";

/// Drives [`LoginFlow`] against the backend.
///
/// Form errors come back to the caller for inline display. Request failures
/// also go to the error handler.
pub struct LoginScreen {
    auth: AuthService,
    flow: LoginFlow,
    collaborators: Collaborators,
    store: Option<SessionStore>,
}

impl LoginScreen {
    /// Opens the screen. A session that is still valid skips the form and
    /// goes straight to the dashboard.
    pub async fn open(
        auth: AuthService,
        collaborators: Collaborators,
        store: Option<SessionStore>,
        return_url: Option<&str>,
    ) -> Self {
        let mut flow = LoginFlow::new(return_url);
        let signed_in = auth
            .api()
            .session()
            .await
            .is_some_and(|s| s.is_valid_at(Utc::now()));
        if signed_in {
            flow.mark_authenticated();
            collaborators.navigator.navigate(DEFAULT_RETURN_URL);
        }
        Self {
            auth,
            flow,
            collaborators,
            store,
        }
    }

    pub fn flow(&self) -> &LoginFlow {
        &self.flow
    }

    pub async fn submit_credentials(&mut self, form: &LoginForm) -> ClientResult<LoginStep> {
        self.flow.begin_credentials(form)?;
        let response = self.auth.login(form).await;
        let response = self.settle(response)?;
        let step = self.flow.complete_credentials(response);
        self.after_step(step).await
    }

    pub async fn submit_two_factor(&mut self, form: &TwoFactorForm) -> ClientResult<LoginStep> {
        self.flow.begin_two_factor(form)?;
        let token = self.flow.two_factor_token().map(str::to_string);
        let response = self.auth.verify_two_factor(form, token.as_deref()).await;
        let response = self.settle(response)?;
        let step = self.flow.complete_two_factor(response);
        self.after_step(step).await
    }

    /// "Use another account": back to the credentials form.
    pub fn restart(&mut self) {
        self.flow.restart();
    }

    fn settle(&mut self, response: ClientResult<LoginResponse>) -> ClientResult<LoginResponse> {
        response
            .map_err(ClientError::into_credentials_error)
            .inspect_err(|err| {
                self.flow.fail();
                self.collaborators.errors.handle(err);
            })
    }

    async fn after_step(
        &mut self,
        step: DomainResult<LoginStep>,
    ) -> ClientResult<LoginStep> {
        let step = step.map_err(|e| {
            let err = ClientError::from(e);
            self.collaborators.errors.handle(&err);
            err
        })?;

        match &step {
            LoginStep::TwoFactorRequired => {
                info!("two-factor code required");
            }
            LoginStep::Authenticated {
                session,
                redirect_to,
            } => {
                self.auth.api().set_session(session.clone()).await;
                if self.flow.remember_me() {
                    if let Some(store) = &self.store {
                        if let Err(err) = store.save(session) {
                            warn!(error = %format!("{err:#}"), "could not remember session");
                        }
                    }
                }
                info!(user = %session.user.id, "signed in");
                self.collaborators.notifier.notify(
                    Notification::success(SIGNED_IN)
                        .with_description(format!("مرحبًا بك، {}!", session.display_name()))
                        .with_duration(DEFAULT_DURATION_MS),
                );
                self.collaborators.navigator.navigate(redirect_to);
            }
        }
        Ok(step)
    }
}

/// Logs out, forgets the remembered session and returns to the login route.
pub async fn sign_out(
    auth: &AuthService,
    collaborators: &Collaborators,
    store: Option<&SessionStore>,
) -> ClientResult<()> {
    auth.logout().await?;
    if let Some(store) = store {
        if let Err(err) = store.clear() {
            warn!(error = %format!("{err:#}"), "could not remove remembered session");
        }
    }
    collaborators.navigator.navigate(LOGIN_ROUTE);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::error::keys;
    use crate::notify::NotifyingErrorHandler;
    use crate::screens::fixtures::Recorded;
    use crate::screens::Collaborators;
    use crate::testing::{live_session, login_body, RecordingTransport};
    use adala_auth::LoginState;
    use serde_json::json;
    use std::sync::Arc;

    fn form() -> LoginForm {
        LoginForm::new("123456", "lawyer@firm.test", "s3cret-pass")
    }

    async fn screen(
        transport: &Arc<RecordingTransport>,
        recorded: &Recorded,
        return_url: Option<&str>,
    ) -> LoginScreen {
        let auth = AuthService::new(ApiClient::new(transport.clone()));
        LoginScreen::open(auth, recorded.collaborators(), None, return_url).await
    }

    #[tokio::test]
    async fn two_factor_challenge_does_not_redirect() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "requiresTwoFactor": true, "twoFactorToken": "tmp-1" }));
        let recorded = Recorded::confirming(true);
        let mut login = screen(&transport, &recorded, Some("/cases")).await;

        let step = login.submit_credentials(&form()).await.unwrap();
        assert_eq!(step, LoginStep::TwoFactorRequired);
        assert!(recorded.navigator.routes().is_empty());
        assert!(matches!(login.flow().state(), LoginState::AwaitingTwoFactor { .. }));
        assert!(!login.flow().is_loading());
    }

    #[tokio::test]
    async fn valid_code_redirects_to_return_url() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "requiresTwoFactor": true, "twoFactorToken": "tmp-1" }));
        transport.push_json(200, login_body());
        let recorded = Recorded::confirming(true);
        let mut login = screen(&transport, &recorded, Some("/cases")).await;

        login.submit_credentials(&form()).await.unwrap();
        let step = login.submit_two_factor(&TwoFactorForm::new("654321")).await.unwrap();

        assert!(matches!(step, LoginStep::Authenticated { ref redirect_to, .. } if redirect_to == "/cases"));
        assert_eq!(recorded.navigator.routes(), ["/cases"]);
        assert_eq!(
            transport.requests()[1].body,
            Some(json!({ "code": "654321", "twoFactorToken": "tmp-1" }))
        );

        let notes = recorded.notifier.taken();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message, SIGNED_IN);
        assert_eq!(notes[0].description.as_deref(), Some("مرحبًا بك، سلمى حداد!"));
    }

    #[tokio::test]
    async fn invalid_form_sends_nothing() {
        let transport = RecordingTransport::new();
        let recorded = Recorded::confirming(true);
        let mut login = screen(&transport, &recorded, None).await;

        let bad = LoginForm::new("12345", "lawyer@firm.test", "s3cret-pass");
        assert!(matches!(
            login.submit_credentials(&bad).await,
            Err(ClientError::Validation(f)) if f.contains("tenant_account_number")
        ));
        assert!(login.flow().is_submitted());
        assert!(transport.calls().is_empty());
        assert!(recorded.errors.errors().is_empty());
    }

    #[tokio::test]
    async fn server_rejection_goes_to_error_handler() {
        let transport = RecordingTransport::new();
        transport.push_json(401, json!({ "message": "بيانات الدخول غير صحيحة" }));
        let recorded = Recorded::confirming(true);
        let mut login = screen(&transport, &recorded, None).await;

        let err = login.submit_credentials(&form()).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidCredentials(_)));
        assert_eq!(recorded.errors.errors(), [err]);
        assert!(!login.flow().is_loading());
        assert_eq!(login.flow().state(), &LoginState::AwaitingCredentials);

        transport.push_json(200, login_body());
        login.submit_credentials(&form()).await.unwrap();
        assert_eq!(recorded.navigator.routes(), [DEFAULT_RETURN_URL]);
    }

    #[tokio::test]
    async fn wrong_password_is_not_an_expired_session() {
        let transport = RecordingTransport::new();
        transport.push_json(401, json!({ "message": "Invalid password" }));
        transport.push_json(200, json!({ "requiresTwoFactor": true, "twoFactorToken": "tmp-1" }));
        transport.push_json(401, json!({ "message": "رمز التحقق غير صحيح" }));
        let recorded = Recorded::confirming(true);
        let handler = NotifyingErrorHandler::new(recorded.notifier.clone(), recorded.navigator.clone());
        let collaborators = Collaborators {
            errors: Arc::new(handler),
            ..recorded.collaborators()
        };
        let auth = AuthService::new(ApiClient::new(transport.clone()));
        let mut login = LoginScreen::open(auth, collaborators, None, None).await;

        let err = login.submit_credentials(&form()).await.unwrap_err();
        assert_eq!(err, ClientError::InvalidCredentials("Invalid password".into()));

        login.submit_credentials(&form()).await.unwrap();
        let err = login.submit_two_factor(&TwoFactorForm::new("000000")).await.unwrap_err();
        assert_eq!(err.server_message(), Some("رمز التحقق غير صحيح"));
        assert!(matches!(login.flow().state(), LoginState::AwaitingTwoFactor { .. }));

        let shown: Vec<_> = recorded.notifier.taken().into_iter().map(|n| n.message).collect();
        assert_eq!(shown, [keys::INVALID_CREDENTIALS, keys::INVALID_CREDENTIALS]);
        assert!(recorded.navigator.routes().is_empty());
    }

    #[tokio::test]
    async fn live_session_skips_the_form() {
        let transport = RecordingTransport::new();
        let api = ApiClient::new(transport.clone());
        api.set_session(live_session()).await;
        let recorded = Recorded::confirming(true);

        let login = LoginScreen::open(AuthService::new(api), recorded.collaborators(), None, Some("/cases")).await;
        assert!(matches!(
            login.flow().state(),
            LoginState::Authenticated { redirect_to } if redirect_to == DEFAULT_RETURN_URL
        ));
        assert_eq!(recorded.navigator.routes(), [DEFAULT_RETURN_URL]);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn remember_me_persists_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));
        let transport = RecordingTransport::new();
        transport.push_json(200, login_body());
        let recorded = Recorded::confirming(true);
        let auth = AuthService::new(ApiClient::new(transport.clone()));
        let mut login = LoginScreen::open(auth, recorded.collaborators(), Some(store.clone()), None).await;

        login.submit_credentials(&form().remember_me(true)).await.unwrap();
        let saved = store.load().unwrap().unwrap();
        assert_eq!(saved.refresh_token.as_deref(), Some("refresh-1"));

        transport.push_json(200, json!({}));
        sign_out(&login.auth, &recorded.collaborators(), Some(&store))
            .await
            .unwrap();
        assert_eq!(transport.calls(), ["POST /auth/login", "POST /auth/logout"]);
        assert!(store.load().unwrap().is_none());
        assert_eq!(recorded.navigator.routes(), [DEFAULT_RETURN_URL, LOGIN_ROUTE]);
    }
}
