//! Shared REST client.
//!
//! All backend traffic goes through one [`ApiClient`]: it resolves paths
//! against the configured base URL, runs the interceptor chain on the fully
//! built request, dispatches it, and maps non-success statuses to
//! [`ApiError::Status`] with a sanitized body.
//!
//! A 401 or 403 is returned to the caller like any other status. The client
//! never clears the session or navigates on its own.

use crate::config::ClientConfig;
use crate::errors::{sanitize_error_body, ApiError};
use crate::http::interceptor::{BearerInterceptor, RequestInterceptor};
use crate::session::CredentialStore;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;

/// REST client shared by every API consumer.
///
/// Cloning is cheap; clones share the connection pool and interceptors.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

impl ApiClient {
    /// Client for `config` with the bearer interceptor reading `store`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, store: CredentialStore) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            interceptors: vec![Arc::new(BearerInterceptor::new(store))],
        })
    }

    /// Append an interceptor; it runs after those already registered.
    #[must_use]
    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Base URL every path is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for `segments` appended to the base URL.
    ///
    /// Each segment is percent-encoded, so values such as logins cannot
    /// introduce extra path components.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request for `method` on `segments`.
    pub fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        Ok(self.http.request(method, self.endpoint(segments)?))
    }

    /// Build `builder`, run the interceptor chain, and dispatch.
    ///
    /// The raw response is returned whatever its status.
    #[instrument(skip_all)]
    pub async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let mut request = builder.build()?;
        for interceptor in &self.interceptors {
            request = interceptor.intercept(request);
        }

        let method = request.method().clone();
        let path = request.url().path().to_string();
        let response = self.http.execute(request).await.map_err(|e| {
            debug!(target: "campus.api", method = %method, path = %path, error = %e, "Request failed");
            ApiError::Transport(e)
        })?;

        debug!(
            target: "campus.api",
            method = %method,
            path = %path,
            status = response.status().as_u16(),
            "Response received"
        );
        Ok(response)
    }

    /// Dispatch and decode a JSON success body.
    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = check_status(self.execute(builder).await?).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Dispatch and discard the success body.
    pub async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        check_status(self.execute(builder).await?).await?;
        Ok(())
    }

    /// `GET` `segments` with `query` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut builder = self.request(Method::GET, segments)?;
        if !query.is_empty() {
            builder = builder.query(query);
        }
        self.send_json(builder).await
    }

    /// Send `body` as JSON with `method` and decode the JSON response.
    pub async fn send_body<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        let builder = self.request(method, segments)?.json(body);
        self.send_json(builder).await
    }

    /// `DELETE` `segments`.
    pub async fn delete(&self, segments: &[&str]) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, segments)?;
        self.send_empty(builder).await
    }
}

/// Map a non-success response to [`ApiError::Status`].
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body: sanitize_error_body(&body),
    })
}
