//! Login state machine.
//!
//! ```text
//! AwaitingCredentials --ok--> Authenticated
//!         |
//!         +--requiresTwoFactor--> AwaitingTwoFactor --ok--> Authenticated
//! ```
//!
//! The flow is pure: it validates forms and interprets responses, while the
//! caller performs the requests between `begin_*` and `complete_*`.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use adala_core::{DomainError, DomainResult, FieldErrors};

use crate::{LoginForm, Permission, Session, SessionUser, TwoFactorForm};

/// Where a successful login lands when no return URL was given.
pub const DEFAULT_RETURN_URL: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    AwaitingCredentials,
    AwaitingTwoFactor { two_factor_token: Option<String> },
    Authenticated { redirect_to: String },
}

/// Outcome of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginStep {
    TwoFactorRequired,
    Authenticated { session: Session, redirect_to: String },
}

/// A submit refused before any request was made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginRejected {
    #[error("invalid form: {0}")]
    Invalid(FieldErrors),

    #[error("a login request is already in flight")]
    Busy,

    #[error("this step is not expected in the current login state")]
    WrongState,
}

/// Body of `POST /auth/login` and `POST /auth/verify-2fa` responses.
///
/// The user is read from `user` when present, otherwise from the top-level
/// fields (the backend flattens it next to the tokens).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub requires_two_factor: bool,
    #[serde(default)]
    pub two_factor_token: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<SessionUser>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl LoginResponse {
    pub fn into_session(self) -> DomainResult<Session> {
        let token = self
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DomainError::malformed("login response has no token"))?;
        let user = match self.user {
            Some(user) => user,
            None => serde_json::from_value(Value::Object(self.rest))
                .map_err(|e| DomainError::malformed(format!("login response user: {e}")))?,
        };
        Ok(Session {
            token,
            refresh_token: self.refresh_token,
            user,
            permissions: self.permissions,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LoginFlow {
    state: LoginState,
    return_url: String,
    loading: bool,
    submitted: bool,
    remember_me: bool,
}

impl LoginFlow {
    /// A blank or missing return URL falls back to [`DEFAULT_RETURN_URL`].
    pub fn new(return_url: Option<&str>) -> Self {
        let return_url = return_url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_RETURN_URL)
            .to_string();
        Self {
            state: LoginState::AwaitingCredentials,
            return_url,
            loading: false,
            submitted: false,
            remember_me: false,
        }
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    pub fn return_url(&self) -> &str {
        &self.return_url
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Set once the current form has been submitted, valid or not.
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn remember_me(&self) -> bool {
        self.remember_me
    }

    pub fn two_factor_token(&self) -> Option<&str> {
        match &self.state {
            LoginState::AwaitingTwoFactor { two_factor_token } => two_factor_token.as_deref(),
            _ => None,
        }
    }

    /// An existing valid session skips the form entirely.
    pub fn mark_authenticated(&mut self) {
        self.loading = false;
        self.state = LoginState::Authenticated {
            redirect_to: DEFAULT_RETURN_URL.to_string(),
        };
    }

    /// Back to the credentials form (e.g. "use another account").
    pub fn restart(&mut self) {
        self.state = LoginState::AwaitingCredentials;
        self.loading = false;
        self.submitted = false;
    }

    fn guard(&self, two_factor_step: bool) -> Result<(), LoginRejected> {
        if self.loading {
            return Err(LoginRejected::Busy);
        }
        let expected = match self.state {
            LoginState::AwaitingCredentials => !two_factor_step,
            LoginState::AwaitingTwoFactor { .. } => two_factor_step,
            LoginState::Authenticated { .. } => false,
        };
        if expected { Ok(()) } else { Err(LoginRejected::WrongState) }
    }

    /// Validate credentials and enter the loading state.
    pub fn begin_credentials(&mut self, form: &LoginForm) -> Result<(), LoginRejected> {
        self.guard(false)?;
        self.submitted = true;
        form.validate().map_err(LoginRejected::Invalid)?;
        self.remember_me = form.remember_me;
        self.loading = true;
        Ok(())
    }

    pub fn complete_credentials(&mut self, response: LoginResponse) -> DomainResult<LoginStep> {
        self.expect_loading(false)?;
        self.loading = false;
        if response.requires_two_factor {
            self.state = LoginState::AwaitingTwoFactor {
                two_factor_token: response.two_factor_token,
            };
            self.submitted = false;
            return Ok(LoginStep::TwoFactorRequired);
        }
        self.authenticate(response)
    }

    /// Validate the two-factor code and enter the loading state.
    pub fn begin_two_factor(&mut self, form: &TwoFactorForm) -> Result<(), LoginRejected> {
        self.guard(true)?;
        self.submitted = true;
        form.validate().map_err(LoginRejected::Invalid)?;
        self.loading = true;
        Ok(())
    }

    pub fn complete_two_factor(&mut self, response: LoginResponse) -> DomainResult<LoginStep> {
        self.expect_loading(true)?;
        self.loading = false;
        self.authenticate(response)
    }

    /// The request failed; the current form stays up for resubmission.
    pub fn fail(&mut self) {
        self.loading = false;
    }

    fn expect_loading(&self, two_factor_step: bool) -> DomainResult<()> {
        let in_step = matches!(
            (&self.state, two_factor_step),
            (LoginState::AwaitingCredentials, false) | (LoginState::AwaitingTwoFactor { .. }, true)
        );
        if self.loading && in_step {
            Ok(())
        } else {
            Err(DomainError::invariant("no matching login request in flight"))
        }
    }

    fn authenticate(&mut self, response: LoginResponse) -> DomainResult<LoginStep> {
        let session = response.into_session()?;
        let redirect_to = self.return_url.clone();
        self.state = LoginState::Authenticated {
            redirect_to: redirect_to.clone(),
        };
        Ok(LoginStep::Authenticated {
            session,
            redirect_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_form() -> LoginForm {
        LoginForm::new("123456", "lawyer@firm.test", "correct horse")
    }

    fn token_response() -> LoginResponse {
        serde_json::from_value(json!({
            "id": "00000000-0000-0000-0000-000000000007",
            "email": "lawyer@firm.test",
            "firstName": "Salma",
            "lastName": "Haddad",
            "role": "lawyer",
            "tenantId": "00000000-0000-0000-0000-000000000001",
            "token": "h.p.s",
            "refreshToken": "r"
        }))
        .unwrap()
    }

    fn two_factor_response() -> LoginResponse {
        serde_json::from_value(json!({ "requiresTwoFactor": true, "twoFactorToken": "tmp" }))
            .unwrap()
    }

    #[test]
    fn return_url_defaults_to_dashboard() {
        assert_eq!(LoginFlow::new(None).return_url(), "/dashboard");
        assert_eq!(LoginFlow::new(Some("  ")).return_url(), "/dashboard");
        assert_eq!(LoginFlow::new(Some("/cases/12")).return_url(), "/cases/12");
    }

    #[test]
    fn invalid_form_is_rejected_without_loading() {
        let mut flow = LoginFlow::new(None);
        let err = flow
            .begin_credentials(&LoginForm::new("12", "x", "y"))
            .unwrap_err();
        assert!(matches!(err, LoginRejected::Invalid(ref e) if e.len() == 3));
        assert!(flow.is_submitted());
        assert!(!flow.is_loading());
        assert_eq!(flow.state(), &LoginState::AwaitingCredentials);
    }

    #[test]
    fn second_submit_while_loading_is_busy() {
        let mut flow = LoginFlow::new(None);
        flow.begin_credentials(&valid_form()).unwrap();
        assert_eq!(flow.begin_credentials(&valid_form()), Err(LoginRejected::Busy));
    }

    #[test]
    fn direct_login_redirects_to_return_url() {
        let mut flow = LoginFlow::new(Some("/contracts"));
        flow.begin_credentials(&valid_form()).unwrap();
        let step = flow.complete_credentials(token_response()).unwrap();
        match step {
            LoginStep::Authenticated {
                session,
                redirect_to,
            } => {
                assert_eq!(redirect_to, "/contracts");
                assert_eq!(session.display_name(), "Salma Haddad");
                assert_eq!(session.refresh_token.as_deref(), Some("r"));
            }
            other => panic!("unexpected step {other:?}"),
        }
        assert!(!flow.is_loading());
    }

    #[test]
    fn two_factor_required_does_not_redirect() {
        let mut flow = LoginFlow::new(Some("/cases"));
        flow.begin_credentials(&valid_form()).unwrap();
        let step = flow.complete_credentials(two_factor_response()).unwrap();
        assert_eq!(step, LoginStep::TwoFactorRequired);
        assert_eq!(flow.two_factor_token(), Some("tmp"));
        assert!(!flow.is_loading());
        assert!(!flow.is_submitted());
    }

    #[test]
    fn two_factor_code_redirects_to_stored_return_url() {
        let mut flow = LoginFlow::new(Some("/cases"));
        flow.begin_credentials(&valid_form()).unwrap();
        flow.complete_credentials(two_factor_response()).unwrap();

        flow.begin_two_factor(&TwoFactorForm::new("123456")).unwrap();
        let step = flow.complete_two_factor(token_response()).unwrap();
        assert!(matches!(step, LoginStep::Authenticated { ref redirect_to, .. } if redirect_to == "/cases"));
        assert_eq!(
            flow.state(),
            &LoginState::Authenticated {
                redirect_to: "/cases".to_string()
            }
        );
    }

    #[test]
    fn two_factor_outside_its_state_is_rejected() {
        let mut flow = LoginFlow::new(None);
        assert_eq!(
            flow.begin_two_factor(&TwoFactorForm::new("123456")),
            Err(LoginRejected::WrongState)
        );
    }

    #[test]
    fn credentials_during_two_factor_are_rejected() {
        let mut flow = LoginFlow::new(None);
        flow.begin_credentials(&valid_form()).unwrap();
        flow.complete_credentials(two_factor_response()).unwrap();
        assert_eq!(flow.begin_credentials(&valid_form()), Err(LoginRejected::WrongState));
    }

    #[test]
    fn failure_allows_resubmission() {
        let mut flow = LoginFlow::new(None);
        flow.begin_credentials(&valid_form()).unwrap();
        flow.fail();
        assert!(!flow.is_loading());
        assert!(flow.begin_credentials(&valid_form()).is_ok());
    }

    #[test]
    fn completion_without_request_is_an_invariant_error() {
        let mut flow = LoginFlow::new(None);
        let err = flow.complete_credentials(token_response()).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn response_without_token_is_malformed() {
        let mut flow = LoginFlow::new(None);
        flow.begin_credentials(&valid_form()).unwrap();
        let err = flow.complete_credentials(LoginResponse::default()).unwrap_err();
        assert!(matches!(err, DomainError::Malformed(_)));
        assert!(!flow.is_loading());
    }

    #[test]
    fn nested_user_is_preferred() {
        let response: LoginResponse = serde_json::from_value(json!({
            "token": "h.p.s",
            "user": {
                "id": "00000000-0000-0000-0000-000000000003",
                "email": "admin@firm.test",
                "name": "المدير",
                "role": "admin"
            },
            "permissions": ["*"]
        }))
        .unwrap();
        let session = response.into_session().unwrap();
        assert_eq!(session.display_name(), "المدير");
        assert!(session.has_permission(&Permission::new("users:delete")));
    }
}
