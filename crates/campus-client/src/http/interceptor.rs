//! Outbound request interceptors.
//!
//! Every request sent through [`super::ApiClient`] passes through its
//! interceptor chain after it is fully built and before it is dispatched.

use crate::session::CredentialStore;
use common::secret::ExposeSecret;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Request;
use tracing::{trace, warn};

/// Hook applied to each outbound request at dispatch time.
///
/// Interceptors are synchronous and must not block: they see the request
/// once, adjust headers, and hand it back.
pub trait RequestInterceptor: Send + Sync {
    /// Return the request to dispatch.
    fn intercept(&self, request: Request) -> Request;
}

/// Attaches `Authorization: Bearer <token>` when a token is stored.
///
/// The store is read on every request, so a login or logout between two
/// calls is reflected in the second one. Requests go out unmodified when no
/// token is stored.
#[derive(Debug, Clone)]
pub struct BearerInterceptor {
    store: CredentialStore,
}

impl BearerInterceptor {
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }
}

impl RequestInterceptor for BearerInterceptor {
    fn intercept(&self, mut request: Request) -> Request {
        let token = match self.store.read() {
            Ok(Some(token)) => token,
            Ok(None) => {
                trace!(
                    target: "campus.http.augmenter",
                    url = %request.url(),
                    "No stored token, request sent without authorization"
                );
                return request;
            }
            Err(e) => {
                warn!(
                    target: "campus.http.augmenter",
                    error = %e,
                    "Token storage unreadable, request sent without authorization"
                );
                return request;
            }
        };

        match HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers_mut().insert(AUTHORIZATION, value);
                trace!(
                    target: "campus.http.augmenter",
                    url = %request.url(),
                    "Authorization header attached"
                );
            }
            Err(_) => {
                warn!(
                    target: "campus.http.augmenter",
                    "Stored token is not a valid header value, request sent without authorization"
                );
            }
        }

        request
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::secret::SecretString;

    fn request() -> Request {
        reqwest::Client::new()
            .get("http://localhost:8080/api/students")
            .build()
            .unwrap()
    }

    #[test]
    fn test_no_token_passes_request_through() {
        let interceptor = BearerInterceptor::new(CredentialStore::in_memory());
        let out = interceptor.intercept(request());
        assert!(out.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_stored_token_is_attached() {
        let store = CredentialStore::in_memory();
        store.store(&SecretString::from("h.c.s")).unwrap();

        let out = BearerInterceptor::new(store).intercept(request());
        let header = out.headers().get(AUTHORIZATION).unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer h.c.s");
        assert!(header.is_sensitive());
    }

    #[test]
    fn test_existing_authorization_is_replaced() {
        let store = CredentialStore::in_memory();
        store.store(&SecretString::from("fresh.token.x")).unwrap();

        let req = reqwest::Client::new()
            .get("http://localhost:8080/api/groups")
            .header(AUTHORIZATION, "Bearer stale")
            .build()
            .unwrap();

        let out = BearerInterceptor::new(store).intercept(req);
        let values: Vec<_> = out.headers().get_all(AUTHORIZATION).iter().collect();
        assert_eq!(values.len(), 1);
        assert_eq!(values.first().unwrap().to_str().unwrap(), "Bearer fresh.token.x");
    }

    #[test]
    fn test_token_is_read_at_dispatch_time() {
        let store = CredentialStore::in_memory();
        let interceptor = BearerInterceptor::new(store.clone());

        let before = interceptor.intercept(request());
        assert!(before.headers().get(AUTHORIZATION).is_none());

        store.store(&SecretString::from("late.login.token")).unwrap();
        let after = interceptor.intercept(request());
        assert!(after.headers().get(AUTHORIZATION).is_some());

        store.clear().unwrap();
        let cleared = interceptor.intercept(request());
        assert!(cleared.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_body_and_method_untouched() {
        let store = CredentialStore::in_memory();
        store.store(&SecretString::from("h.c.s")).unwrap();

        let req = reqwest::Client::new()
            .post("http://localhost:8080/api/groups")
            .body("{\"name\":\"G1\"}")
            .build()
            .unwrap();

        let out = BearerInterceptor::new(store).intercept(req);
        assert_eq!(out.method(), reqwest::Method::POST);
        let body = out.body().and_then(reqwest::Body::as_bytes).unwrap();
        assert_eq!(body, b"{\"name\":\"G1\"}");
    }
}
