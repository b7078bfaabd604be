//! Bearer-token claim decoding shared across Campus Admin components.
//!
//! The client never verifies token signatures; the backend does that on every
//! request. This module only inspects the claims segment so the client can
//! answer "who is logged in, with which role, until when".
//!
//! - Tokens are size-checked BEFORE parsing
//! - Exactly three dot-separated segments are required
//! - The claims segment accepts base64url with or without padding
//! - The `sub` field in [`SessionClaims`] is redacted in Debug output
//! - `exp` and `iat` are NumericDates and may carry a fractional part
//! - A token without `exp` still decodes, but is always expired
//!
//! # Usage
//!
//! ```rust,ignore
//! use common::jwt::decode_claims;
//!
//! let claims = decode_claims(token)?;
//! if claims.is_expired() {
//!     // send the user back to the login screen
//! }
//! ```

use crate::types::Role;
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum accepted token size in bytes (8KB).
///
/// Typical session tokens are a few hundred bytes. Anything larger is treated
/// as malformed before any base64 or JSON work is done.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

/// base64url engine that tolerates both padded and unpadded input.
const CLAIMS_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

// =============================================================================
// Error Types
// =============================================================================

/// Reasons a stored token could not be interpreted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    /// Token size exceeds [`MAX_JWT_SIZE_BYTES`].
    #[error("Token exceeds maximum size")]
    TokenTooLarge,

    /// Token does not have exactly three segments.
    #[error("Token does not have three segments")]
    WrongSegmentCount,

    /// Claims segment is not valid base64url.
    #[error("Token claims are not valid base64url")]
    InvalidEncoding,

    /// Claims segment decoded but is not a valid claims document.
    #[error("Token claims are not a valid claims document")]
    InvalidClaims,
}

// =============================================================================
// Claims Types
// =============================================================================

/// Claims carried by a session token.
///
/// # Fields
///
/// - `sub`: principal identifier (the user's login)
/// - `auth`: single authority string, e.g. `ROLE_ADMIN`
/// - `exp`: expiration timestamp (Unix epoch seconds, possibly fractional)
/// - `iat`: issued-at timestamp (Unix epoch seconds, possibly fractional)
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (login) - redacted in Debug output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Authority claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,

    /// Expiration timestamp. Missing means the token never counts as valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<f64>,

    /// Issued-at timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<f64>,
}

impl fmt::Debug for SessionClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClaims")
            .field("sub", &self.sub.as_ref().map(|_| "[REDACTED]"))
            .field("auth", &self.auth)
            .field("exp", &self.exp)
            .field("iat", &self.iat)
            .finish()
    }
}

impl SessionClaims {
    /// The role named by the `auth` claim, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.auth.as_deref().map(Role::from_claim)
    }

    /// Whether the token has expired at `now` (Unix epoch seconds).
    ///
    /// A token expiring exactly at `now` is expired, as is one without `exp`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn is_expired_at(&self, now: i64) -> bool {
        match self.exp {
            Some(exp) => exp <= now as f64,
            None => true,
        }
    }

    /// Whether the token has expired by the wall clock.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// Expiration as a UTC instant, if present and representable.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(numeric_date)
    }

    /// Issue time as a UTC instant, if present and representable.
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(numeric_date)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn numeric_date(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((secs * 1000.0).floor() as i64)
}

// =============================================================================
// Functions
// =============================================================================

/// Decode the claims segment of a compact token without verifying it.
///
/// # Errors
///
/// - `TokenTooLarge` - token exceeds [`MAX_JWT_SIZE_BYTES`]
/// - `WrongSegmentCount` - token is not `header.claims.signature`
/// - `InvalidEncoding` - claims segment is not base64url
/// - `InvalidClaims` - decoded bytes are not a JSON claims object
pub fn decode_claims(token: &str) -> Result<SessionClaims, ClaimsError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(ClaimsError::TokenTooLarge);
    }

    let mut parts = token.split('.');
    let (Some(_header), Some(claims_part), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        tracing::debug!(target: "common.jwt", "Token rejected: invalid segment count");
        return Err(ClaimsError::WrongSegmentCount);
    };

    let claims_bytes = CLAIMS_ENGINE.decode(claims_part).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to decode claims base64");
        ClaimsError::InvalidEncoding
    })?;

    serde_json::from_slice::<SessionClaims>(&claims_bytes).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to parse claims JSON");
        ClaimsError::InvalidClaims
    })
}

// =============================================================================
// Tests
// =============================================================================
