//! Client configuration.
//!
//! Configuration is loaded from environment variables. Nothing here is
//! secret: credentials are typed at login and the token lives in storage.

use common::config::ObservabilityConfig;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default REST API base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Default directory holding the persisted token.
pub const DEFAULT_TOKEN_DIR: &str = ".campus";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every API path is appended to (no trailing slash).
    pub api_base_url: Url,

    /// Directory used by the file-backed token storage.
    pub token_dir: PathBuf,

    /// Overall request timeout. `None` leaves the transport default in place.
    pub http_timeout: Option<Duration>,

    /// Whether feature areas are additionally gated by role.
    pub enforce_route_roles: bool,

    /// Logging setup for the binary.
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid API base URL: {0}")]
    InvalidApiBaseUrl(String),

    #[error("Invalid HTTP timeout configuration: {0}")]
    InvalidHttpTimeout(String),

    #[error("Invalid boolean for {name}: '{value}'")]
    InvalidFlag { name: String, value: String },
}

impl ClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let raw_base = vars
            .get("CAMPUS_API_BASE_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = parse_base_url(&raw_base)?;

        let token_dir = vars
            .get("CAMPUS_TOKEN_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_DIR));

        let http_timeout = if let Some(value_str) = vars.get("CAMPUS_HTTP_TIMEOUT_SECONDS") {
            let value: u64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidHttpTimeout(format!(
                    "CAMPUS_HTTP_TIMEOUT_SECONDS must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidHttpTimeout(
                    "CAMPUS_HTTP_TIMEOUT_SECONDS must be greater than 0".to_string(),
                ));
            }

            Some(Duration::from_secs(value))
        } else {
            None
        };

        let enforce_route_roles = parse_flag(vars, "CAMPUS_ENFORCE_ROUTE_ROLES")?;

        Ok(Self {
            api_base_url,
            token_dir,
            http_timeout,
            enforce_route_roles,
            observability: ObservabilityConfig::from_vars(vars),
        })
    }

    /// Configuration pointing at `base_url` with every other field defaulted.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let vars = HashMap::from([("CAMPUS_API_BASE_URL".to_string(), base_url.to_string())]);
        Self::from_vars(&vars)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidApiBaseUrl(format!("'{}': {}", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidApiBaseUrl(format!(
            "'{}': scheme must be http or https",
            raw
        )));
    }
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidApiBaseUrl(format!(
            "'{}': cannot be used as a base",
            raw
        )));
    }

    Ok(url)
}

fn parse_flag(vars: &HashMap<String, String>, name: &str) -> Result<bool, ConfigError> {
    match vars.get(name).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) if v.is_empty() || v == "false" || v == "0" => Ok(false),
        Some(v) if v == "true" || v == "1" => Ok(true),
        Some(v) => Err(ConfigError::InvalidFlag {
            name: name.to_string(),
            value: v,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_vars(&HashMap::new()).unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://localhost:8080/api");
        assert_eq!(config.token_dir, PathBuf::from(".campus"));
        assert_eq!(config.http_timeout, None);
        assert!(!config.enforce_route_roles);
        assert!(!config.observability.json_logs);
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ClientConfig::for_base_url("https://school.example.com/api/").unwrap();
        assert_eq!(config.api_base_url.as_str(), "https://school.example.com/api");
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let result = ClientConfig::for_base_url("ftp://school.example.com/api");
        assert!(matches!(result, Err(ConfigError::InvalidApiBaseUrl(_))));
    }

    #[test]
    fn test_rejects_garbage_url() {
        let result = ClientConfig::for_base_url("not a url");
        assert!(matches!(result, Err(ConfigError::InvalidApiBaseUrl(_))));
    }

    #[test]
    fn test_timeout_parsing() {
        let vars = HashMap::from([(
            "CAMPUS_HTTP_TIMEOUT_SECONDS".to_string(),
            "15".to_string(),
        )]);
        let config = ClientConfig::from_vars(&vars).unwrap();
        assert_eq!(config.http_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_timeout_rejects_zero_and_garbage() {
        for bad in ["0", "-3", "soon"] {
            let vars = HashMap::from([(
                "CAMPUS_HTTP_TIMEOUT_SECONDS".to_string(),
                bad.to_string(),
            )]);
            let result = ClientConfig::from_vars(&vars);
            assert!(
                matches!(result, Err(ConfigError::InvalidHttpTimeout(_))),
                "expected rejection for {bad}"
            );
        }
    }

    #[test]
    fn test_enforce_route_roles_flag() {
        let vars = HashMap::from([(
            "CAMPUS_ENFORCE_ROUTE_ROLES".to_string(),
            "TRUE".to_string(),
        )]);
        assert!(ClientConfig::from_vars(&vars).unwrap().enforce_route_roles);

        let vars = HashMap::from([(
            "CAMPUS_ENFORCE_ROUTE_ROLES".to_string(),
            "maybe".to_string(),
        )]);
        assert!(matches!(
            ClientConfig::from_vars(&vars),
            Err(ConfigError::InvalidFlag { .. })
        ));
    }

    #[test]
    fn test_token_dir_override() {
        let vars = HashMap::from([(
            "CAMPUS_TOKEN_DIR".to_string(),
            "/tmp/campus-tokens".to_string(),
        )]);
        let config = ClientConfig::from_vars(&vars).unwrap();
        assert_eq!(config.token_dir, PathBuf::from("/tmp/campus-tokens"));
    }
}
