//! Builder patterns for test tokens
//!
//! Tokens are compact `header.claims.signature` strings. The client never
//! verifies signatures, so `build` emits a placeholder signature; use
//! `build_signed` when a real HS256 token is wanted.

use crate::test_ids::{ROLE_ADMIN, TEST_ADMIN_LOGIN, TEST_SIGNING_SECRET};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Map, Value};

/// Builder for test session tokens
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .for_user("prof.durand")
///     .with_role("ROLE_PROFESSOR")
///     .expires_in(600)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct TestTokenBuilder {
    sub: Option<String>,
    auth: Option<String>,
    exp: Option<Value>,
    iat: i64,
}

impl TestTokenBuilder {
    /// Admin token valid for one hour
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            sub: Some(TEST_ADMIN_LOGIN.to_string()),
            auth: Some(ROLE_ADMIN.to_string()),
            exp: Some(json!((now + Duration::seconds(3600)).timestamp())),
            iat: now.timestamp(),
        }
    }

    /// Set the subject (login)
    pub fn for_user(mut self, subject: &str) -> Self {
        self.sub = Some(subject.to_string());
        self
    }

    /// Drop the `sub` claim
    pub fn without_subject(mut self) -> Self {
        self.sub = None;
        self
    }

    /// Set the authority claim
    pub fn with_role(mut self, role: &str) -> Self {
        self.auth = Some(role.to_string());
        self
    }

    /// Drop the `auth` claim
    pub fn without_role(mut self) -> Self {
        self.auth = None;
        self
    }

    /// Set issued-at timestamp
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.iat = timestamp;
        self
    }

    /// Set the absolute expiry (epoch seconds)
    pub fn expires_at(mut self, timestamp: i64) -> Self {
        self.exp = Some(json!(timestamp));
        self
    }

    /// Set a fractional absolute expiry, e.g. `4000000000.5`
    pub fn expires_at_fractional(mut self, timestamp: f64) -> Self {
        self.exp = Some(json!(timestamp));
        self
    }

    /// Set expiration in seconds from now
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = Some(json!((Utc::now() + Duration::seconds(seconds)).timestamp()));
        self
    }

    /// Expired one minute ago
    pub fn expired(self) -> Self {
        self.expires_in(-60)
    }

    /// Drop the `exp` claim; the token decodes but never counts as valid
    pub fn without_expiry(mut self) -> Self {
        self.exp = None;
        self
    }

    /// Build the claims as a JSON value
    pub fn build_claims(&self) -> Value {
        let mut claims = Map::new();
        if let Some(sub) = &self.sub {
            claims.insert("sub".to_string(), json!(sub));
        }
        if let Some(auth) = &self.auth {
            claims.insert("auth".to_string(), json!(auth));
        }
        if let Some(exp) = &self.exp {
            claims.insert("exp".to_string(), exp.clone());
        }
        claims.insert("iat".to_string(), json!(self.iat));
        Value::Object(claims)
    }

    /// Unsigned compact token carrying the claims
    pub fn build(self) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS512","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(self.build_claims().to_string());
        format!("{header}.{claims}.test-signature")
    }

    /// HS256 token signed with [`TEST_SIGNING_SECRET`]
    pub fn build_signed(self) -> String {
        encode(
            &Header::default(),
            &self.build_claims(),
            &EncodingKey::from_secret(TEST_SIGNING_SECRET),
        )
        .expect("HS256 signing of test claims cannot fail")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Strings that look like tokens but cannot be decoded
///
/// Covers wrong segment counts, non-base64 claims, non-JSON claims, a
/// non-numeric `exp`, and oversized tokens. The empty string is not included; an
/// empty token reads as absent rather than malformed.
pub fn malformed_tokens() -> Vec<String> {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS512"}"#);
    vec![
        "not-a-token".to_string(),
        "only.two".to_string(),
        format!("{header}.{header}.sig.extra"),
        format!("{header}.!!!not*base64!!!.sig"),
        format!("{header}.{}.sig", URL_SAFE_NO_PAD.encode("not json")),
        format!("{header}.{}.sig", URL_SAFE_NO_PAD.encode(r#"{"sub":"admin","exp":"soon"}"#)),
        format!("{header}.{}.sig", URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0xfd])),
        format!("{header}.{}.sig", "A".repeat(9000)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

    #[test]
    fn test_builder_defaults_to_valid_admin() {
        let claims = TestTokenBuilder::new().build_claims();
        assert_eq!(claims["sub"], "admin");
        assert_eq!(claims["auth"], "ROLE_ADMIN");
        assert!(claims["exp"].as_i64().unwrap() > Utc::now().timestamp());
    }

    #[test]
    fn test_optional_claims_can_be_dropped() {
        let claims = TestTokenBuilder::new()
            .without_subject()
            .without_role()
            .without_expiry()
            .build_claims();
        assert!(claims.get("sub").is_none());
        assert!(claims.get("auth").is_none());
        assert!(claims.get("exp").is_none());
        assert!(claims.get("iat").is_some());
    }

    #[test]
    fn test_unsigned_token_has_three_segments() {
        let token = TestTokenBuilder::new().for_user("alice").build();
        let parts: Vec<_> = token.split('.').collect();
        assert_eq!(parts.len(), 3);

        let claims: Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
        assert_eq!(claims["sub"], "alice");
    }

    #[test]
    fn test_signed_token_verifies() {
        let token = TestTokenBuilder::new().with_role("ROLE_PROFESSOR").build_signed();
        let decoded = decode::<Value>(
            &token,
            &DecodingKey::from_secret(TEST_SIGNING_SECRET),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();
        assert_eq!(decoded.claims["auth"], "ROLE_PROFESSOR");
    }

    #[test]
    fn test_malformed_fixtures_are_non_empty() {
        let tokens = malformed_tokens();
        assert!(tokens.iter().all(|t| !t.is_empty()));
        assert!(tokens.iter().any(|t| t.len() > 8192));
    }
}
