//! Login form controller.
//!
//! Owns the state a login screen renders: per-field errors, the submitting
//! flag, and banner messages. Submission goes through [`AuthClient`]; success
//! navigates home.

use crate::auth::client::{AuthClient, LoginError};
use crate::routing::{Navigator, HOME_PATH};
use crate::session::Session;
use common::secret::{ExposeSecret, SecretString};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Banner text used when a failure carries no server message.
pub const FALLBACK_ERROR_MESSAGE: &str = "Validation error";

/// Form input that receives errors reported against the backend's
/// `username` field.
pub const USERNAME_INPUT: &str = "email";

/// Values typed into the login form.
#[derive(Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: SecretString,
    pub remember: bool,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: SecretString, remember: bool) -> Self {
        Self {
            username: username.into(),
            password,
            remember,
        }
    }

    /// Both required inputs are filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.expose_secret().is_empty()
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("remember", &self.remember)
            .finish()
    }
}

/// Banner severity. Login only ever reports failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

/// Message shown above the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BannerMessage {
    pub severity: Severity,
    pub detail: String,
}

/// What the login screen renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoginFormState {
    /// Form input name to error message.
    pub errors: BTreeMap<String, String>,
    pub submitting: bool,
    pub messages: Vec<BannerMessage>,
}

/// Result of one submission.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Refused before reaching the backend.
    Incomplete,
    LoggedIn(Session),
    Failed(LoginError),
}

/// Drives the login form.
pub struct LoginController {
    auth: AuthClient,
    navigator: Arc<dyn Navigator>,
    state: LoginFormState,
}

impl fmt::Debug for LoginController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginController")
            .field("auth", &self.auth)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl LoginController {
    pub fn new(auth: AuthClient, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            auth,
            navigator,
            state: LoginFormState::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &LoginFormState {
        &self.state
    }

    /// Submit the form.
    ///
    /// Blank input is refused without a request. Otherwise previous errors
    /// are cleared and the backend is asked. On success the navigator is sent
    /// home; on failure the state carries field errors and one error banner.
    #[instrument(skip_all)]
    pub async fn submit(&mut self, form: &LoginForm) -> SubmitOutcome {
        if !form.is_complete() {
            debug!(target: "campus.auth.client", "Login form incomplete, not submitting");
            return SubmitOutcome::Incomplete;
        }

        self.state.errors.clear();
        self.state.messages.clear();
        self.state.submitting = true;

        match self
            .auth
            .login(form.username.trim(), &form.password, form.remember)
            .await
        {
            Ok(session) => {
                self.state.submitting = false;
                self.navigator.navigate(HOME_PATH);
                SubmitOutcome::LoggedIn(session)
            }
            Err(err) => {
                self.record_failure(&err);
                SubmitOutcome::Failed(err)
            }
        }
    }

    fn record_failure(&mut self, err: &LoginError) {
        self.state.submitting = false;

        for field_error in err.field_errors() {
            let input = if field_error.field == "username" {
                USERNAME_INPUT
            } else {
                field_error.field.as_str()
            };
            self.state
                .errors
                .insert(input.to_string(), field_error.message.clone());
        }

        let detail = err
            .server_message()
            .filter(|m| !m.is_empty())
            .unwrap_or(FALLBACK_ERROR_MESSAGE);
        self.state.messages.push(BannerMessage {
            severity: Severity::Error,
            detail: detail.to_string(),
        });
    }
}
