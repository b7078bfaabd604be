//! Outbound HTTP plumbing: the shared REST client and its interceptors.

pub mod api_client;
pub mod interceptor;

pub use api_client::ApiClient;
pub use interceptor::{BearerInterceptor, RequestInterceptor};
