//! Mock REST backend for integration tests
//!
//! Wraps a wiremock server mounted under `/api`, the same prefix the real
//! backend serves from, with helpers for the endpoints the client talks to.

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Path prefix of every API route.
pub const API_PREFIX: &str = "/api";

/// Mock backend
///
/// # Example
/// ```rust,ignore
/// let backend = MockBackend::start().await;
/// backend.mock_login_success(&TestTokenBuilder::new().build()).await;
/// let config = ClientConfig::for_base_url(&backend.api_base_url())?;
/// ```
pub struct MockBackend {
    server: MockServer,
}

impl MockBackend {
    /// Start a backend on a random local port
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Underlying wiremock server, for custom mocks
    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Base URL to configure the client with
    pub fn api_base_url(&self) -> String {
        format!("{}{API_PREFIX}", self.server.uri())
    }

    /// Full request path for an API route, e.g. `students/1` -> `/api/students/1`
    pub fn api_path(route: &str) -> String {
        format!("{API_PREFIX}/{}", route.trim_start_matches('/'))
    }

    /// Login succeeds with `{token}`
    pub async fn mock_login_success(&self, token: &str) {
        self.mock_login_body(200, json!({ "token": token })).await;
    }

    /// Login succeeds with `{id_token}`
    pub async fn mock_login_success_id_token(&self, token: &str) {
        self.mock_login_body(200, json!({ "id_token": token })).await;
    }

    /// Login fails with 400 and the given `(field, message)` pairs
    pub async fn mock_login_validation_error(&self, message: &str, fields: &[(&str, &str)]) {
        let field_errors: Vec<Value> = fields
            .iter()
            .map(|(field, msg)| json!({ "objectName": "loginVM", "field": field, "message": msg }))
            .collect();
        self.mock_login_body(
            400,
            json!({ "message": message, "fieldErrors": field_errors }),
        )
        .await;
    }

    /// Login fails with `status` and an empty body
    pub async fn mock_login_status(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(Self::api_path("authenticate")))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    async fn mock_login_body(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(Self::api_path("authenticate")))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// `GET {route}` answers 200 with `body`
    pub async fn mock_get_json(&self, route: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(Self::api_path(route)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// `{http_method} {route}` answers `status` with `body` as text
    pub async fn mock_status(&self, http_method: &str, route: &str, status: u16, body: &str) {
        Mock::given(method(http_method))
            .and(path(Self::api_path(route)))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Every request received so far
    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// `Authorization` header of each received request, in arrival order
    pub async fn authorization_headers(&self) -> Vec<Option<String>> {
        self.requests()
            .await
            .iter()
            .map(|r| {
                r.headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_path() {
        assert_eq!(MockBackend::api_path("students/1"), "/api/students/1");
        assert_eq!(MockBackend::api_path("/dashboard"), "/api/dashboard");
    }

    #[tokio::test]
    async fn test_fresh_backend_has_no_requests() {
        let backend = MockBackend::start().await;
        backend.mock_login_success("abc").await;

        assert!(backend.api_base_url().ends_with("/api"));
        assert!(backend.requests().await.is_empty());
        assert!(backend.authorization_headers().await.is_empty());
    }
}
