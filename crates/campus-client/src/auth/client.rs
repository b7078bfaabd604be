//! Authentication client.
//!
//! Submits credentials to `POST /authenticate`, normalizes the token out of
//! the response, and hands it to the credential store.

use crate::http::ApiClient;
use crate::session::{CredentialStore, Session, StorageError};
use common::jwt::decode_claims;
use common::secret::{ExposeSecret, SecretString};
use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Path of the login endpoint, relative to the API base URL.
pub const AUTHENTICATE_PATH: &str = "authenticate";

/// Login failures.
#[derive(Debug, Error)]
pub enum LoginError {
    /// HTTP 400 carrying per-field validation errors.
    #[error("Login validation failed: {}", .message.as_deref().unwrap_or("no message"))]
    Validation {
        message: Option<String>,
        field_errors: Vec<FieldError>,
    },

    /// Any other non-success status.
    #[error("Login rejected with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// Request never produced a response.
    #[error("Login request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Success status but no usable token in the body.
    #[error("Invalid login response: {0}")]
    InvalidResponse(String),

    /// Token could not be persisted.
    #[error("Failed to store session token: {0}")]
    Storage(#[from] StorageError),
}

impl LoginError {
    /// Message the backend attached to the failure, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            LoginError::Validation { message, .. } | LoginError::Rejected { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// Per-field validation errors; empty unless this is `Validation`.
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            LoginError::Validation { field_errors, .. } => field_errors,
            _ => &[],
        }
    }
}

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    #[serde(default)]
    pub object_name: Option<String>,
    pub field: String,
    #[serde(default)]
    pub message: String,
}

/// Error body produced by the backend.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProblemBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    field_errors: Option<Vec<FieldError>>,
}

/// Credentials sent to the login endpoint.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
    pub remember_me: bool,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("remember_me", &self.remember_me)
            .finish()
    }
}

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Success body: either `{token}` or `{id_token}`.
///
/// When both keys are present `token` wins.
#[derive(Deserialize)]
#[serde(untagged)]
enum LoginResponse {
    Token { token: String },
    IdToken { id_token: String },
}

impl LoginResponse {
    /// The one canonical token carried by the response.
    fn into_token(self) -> Result<SecretString, LoginError> {
        let raw = match self {
            LoginResponse::Token { token } | LoginResponse::IdToken { id_token: token } => token,
        };
        if raw.is_empty() {
            return Err(LoginError::InvalidResponse("token is empty".to_string()));
        }
        Ok(SecretString::from(raw))
    }
}

/// Client for the login endpoint.
#[derive(Debug, Clone)]
pub struct AuthClient {
    api: ApiClient,
    store: CredentialStore,
}

impl AuthClient {
    pub fn new(api: ApiClient, store: CredentialStore) -> Self {
        Self { api, store }
    }

    /// The store this client writes tokens into.
    #[must_use]
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Authenticate and persist the returned token.
    ///
    /// Single attempt, no retry. On success the token is stored and a
    /// session derived from it is returned. `remember_me` is forwarded to
    /// the backend only.
    ///
    /// # Errors
    ///
    /// - `Validation` - 400 with field errors
    /// - `Rejected` - any other non-success status
    /// - `Transport` - no response
    /// - `InvalidResponse` - success without a usable token; an undecodable
    ///   token is still stored before this is returned
    /// - `Storage` - the token could not be persisted
    #[instrument(skip_all)]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
        remember_me: bool,
    ) -> Result<Session, LoginError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.clone(),
            remember_me,
        };

        debug!(target: "campus.auth.client", remember_me, "Submitting login");

        let builder = self
            .api
            .request(Method::POST, &[AUTHENTICATE_PATH])
            .map_err(|e| LoginError::InvalidResponse(e.to_string()))?
            .header(ACCEPT, "application/json")
            .json(&request);

        let response = self.api.execute(builder).await.map_err(|e| match e {
            crate::errors::ApiError::Transport(inner) => LoginError::Transport(inner),
            other => LoginError::InvalidResponse(other.to_string()),
        })?;

        let status = response.status();
        let body = response.text().await.map_err(LoginError::Transport)?;

        if !status.is_success() {
            return Err(failure_from(status, &body));
        }

        let token = serde_json::from_str::<LoginResponse>(&body)
            .map_err(|_| {
                warn!(target: "campus.auth.client", "Login response carried no token");
                LoginError::InvalidResponse("no token in response".to_string())
            })?
            .into_token()?;

        self.store.store(&token)?;

        let claims = decode_claims(token.expose_secret()).map_err(|e| {
            warn!(
                target: "campus.auth.client",
                error = %e,
                "Stored token from login could not be decoded"
            );
            LoginError::InvalidResponse(format!("token is not decodable: {e}"))
        })?;

        let valid = !claims.is_expired();
        info!(
            target: "campus.auth.client",
            role = claims.auth.as_deref().unwrap_or("none"),
            valid,
            "Login succeeded"
        );
        Ok(Session { claims, valid })
    }
}

/// Interpret a non-success login response.
fn failure_from(status: StatusCode, body: &str) -> LoginError {
    let problem: ProblemBody = serde_json::from_str(body).unwrap_or_default();

    warn!(
        target: "campus.auth.client",
        status = status.as_u16(),
        "Login rejected"
    );

    match (status, problem.field_errors) {
        (StatusCode::BAD_REQUEST, Some(field_errors)) => LoginError::Validation {
            message: problem.message,
            field_errors,
        },
        _ => LoginError::Rejected {
            status: status.as_u16(),
            message: problem.message,
        },
    }
}
