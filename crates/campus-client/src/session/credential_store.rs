//! Credential store: the single source of truth for the session token.
//!
//! The store persists one raw token string and decodes its claims on demand.
//! Nothing derived from the token is cached; every call reads storage again,
//! so a login or logout performed through any handle sharing the same
//! [`TokenStorage`] is observed by the next call on every other handle.

use crate::session::storage::{MemoryStorage, StorageError, TokenStorage};
use common::jwt::{decode_claims, ClaimsError, SessionClaims};
use common::secret::{ExposeSecret, SecretString};
use common::types::Role;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Storage key holding the raw token.
pub const TOKEN_KEY: &str = "token";

/// Why no claims could be produced from storage.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No token (or an empty token) is stored.
    #[error("No session token is stored")]
    Absent,

    /// A token is stored but could not be decoded.
    #[error("Stored session token is malformed: {0}")]
    Malformed(#[from] ClaimsError),

    /// Storage could not be read.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Snapshot of the current session, derived fresh from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Decoded claims.
    pub claims: SessionClaims,
    /// Whether the token was unexpired when the snapshot was taken.
    pub valid: bool,
}

impl Session {
    /// Role named by the token, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.claims.role()
    }

    /// Subject (login) named by the token, if any.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.claims.sub.as_deref()
    }
}

/// Handle to the persisted session token.
///
/// Cloning is cheap; clones share the same storage.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn TokenStorage>,
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl CredentialStore {
    /// Create a store over the given storage.
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self { storage }
    }

    /// Create a store over a fresh, unshared in-memory storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Persist `token`, overwriting any previous value.
    ///
    /// The value is not validated; a malformed token simply fails to decode
    /// later.
    pub fn store(&self, token: &SecretString) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token.expose_secret())?;
        tracing::debug!(target: "campus.session.store", "Session token stored");
        Ok(())
    }

    /// Raw stored token. An empty stored string reads as absent.
    pub fn read(&self) -> Result<Option<SecretString>, StorageError> {
        Ok(self
            .storage
            .get(TOKEN_KEY)?
            .filter(|t| !t.is_empty())
            .map(SecretString::from))
    }

    /// Decode the claims of the stored token.
    ///
    /// # Errors
    ///
    /// - `Absent` - nothing is stored
    /// - `Malformed` - a token is stored but its claims cannot be decoded
    /// - `Storage` - storage could not be read
    pub fn decode(&self) -> Result<SessionClaims, SessionError> {
        let token = self.read()?.ok_or(SessionError::Absent)?;
        decode_claims(token.expose_secret()).map_err(|e| {
            tracing::debug!(
                target: "campus.session.store",
                error = %e,
                "Stored token could not be decoded"
            );
            SessionError::Malformed(e)
        })
    }

    /// Decoded claims, or `None` when absent, malformed, or unreadable.
    #[must_use]
    pub fn claims(&self) -> Option<SessionClaims> {
        match self.decode() {
            Ok(claims) => Some(claims),
            Err(SessionError::Storage(e)) => {
                tracing::warn!(
                    target: "campus.session.store",
                    error = %e,
                    "Token storage unreadable, treating session as absent"
                );
                None
            }
            Err(_) => None,
        }
    }

    /// Whether a decodable, unexpired token is stored.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.claims().is_some_and(|c| !c.is_expired())
    }

    /// Deterministic variant of [`Self::is_valid`] evaluated at `now`
    /// (Unix epoch seconds).
    #[must_use]
    pub fn is_valid_at(&self, now: i64) -> bool {
        self.claims().is_some_and(|c| !c.is_expired_at(now))
    }

    /// Subject of the stored token.
    #[must_use]
    pub fn subject(&self) -> Option<String> {
        self.claims().and_then(|c| c.sub)
    }

    /// Role of the stored token.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.claims().and_then(|c| c.role())
    }

    /// Current session snapshot, or `None` when no claims can be decoded.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.claims().map(|claims| {
            let valid = !claims.is_expired();
            Session { claims, valid }
        })
    }

    /// Session snapshot evaluated at `now` (Unix epoch seconds).
    #[must_use]
    pub fn session_at(&self, now: i64) -> Option<Session> {
        self.claims().map(|claims| {
            let valid = !claims.is_expired_at(now);
            Session { claims, valid }
        })
    }

    /// Remove the stored token.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(TOKEN_KEY)?;
        tracing::debug!(target: "campus.session.store", "Session token cleared");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use campus_test_utils::{malformed_tokens, TestTokenBuilder};

    const NOW: i64 = 1_700_000_000;

    fn store_token(store: &CredentialStore, token: &str) {
        store.store(&SecretString::from(token)).unwrap();
    }

    #[test]
    fn test_store_then_read_returns_token() {
        let store = CredentialStore::in_memory();
        store_token(&store, "a.b.c");
        assert_eq!(store.read().unwrap().unwrap().expose_secret(), "a.b.c");
    }

    #[test]
    fn test_store_overwrites_previous_token() {
        let store = CredentialStore::in_memory();
        store_token(&store, "first.token.x");
        store_token(&store, "second.token.y");
        assert_eq!(
            store.read().unwrap().unwrap().expose_secret(),
            "second.token.y"
        );
    }

    #[test]
    fn test_empty_token_reads_as_absent() {
        let store = CredentialStore::in_memory();
        store_token(&store, "");
        assert!(store.read().unwrap().is_none());
        assert!(matches!(store.decode(), Err(SessionError::Absent)));
    }

    #[test]
    fn test_no_token_yields_absent_everything() {
        let store = CredentialStore::in_memory();
        assert!(matches!(store.decode(), Err(SessionError::Absent)));
        assert!(store.claims().is_none());
        assert!(store.role().is_none());
        assert!(store.subject().is_none());
        assert!(store.session().is_none());
        assert!(!store.is_valid());
    }

    #[test]
    fn test_valid_token_projections() {
        let store = CredentialStore::in_memory();
        let token = TestTokenBuilder::new()
            .for_user("prof.smith")
            .with_role("ROLE_PROFESSOR")
            .issued_at(NOW - 60)
            .expires_at(NOW + 3600)
            .build();
        store_token(&store, &token);

        assert!(store.is_valid_at(NOW));
        assert_eq!(store.role(), Some(Role::Professor));
        assert_eq!(store.subject().as_deref(), Some("prof.smith"));

        let session = store.session_at(NOW).unwrap();
        assert!(session.valid);
        assert_eq!(session.subject(), Some("prof.smith"));
        assert_eq!(
            session.claims.issued_at().map(|t| t.timestamp()),
            Some(NOW - 60)
        );
    }

    #[test]
    fn test_expiry_is_strict() {
        let store = CredentialStore::in_memory();
        let token = TestTokenBuilder::new().expires_at(NOW).build();
        store_token(&store, &token);

        assert!(store.is_valid_at(NOW - 1));
        assert!(!store.is_valid_at(NOW));
        assert!(!store.is_valid_at(NOW + 1));

        // Expired tokens still decode; only validity changes.
        let session = store.session_at(NOW).unwrap();
        assert!(!session.valid);
    }

    #[test]
    fn test_expired_token_is_invalid_against_wall_clock() {
        let store = CredentialStore::in_memory();
        store_token(&store, &TestTokenBuilder::new().expired().build());
        assert!(!store.is_valid());
        assert!(store.claims().is_some());
    }

    #[test]
    fn test_malformed_tokens_decode_to_malformed() {
        let store = CredentialStore::in_memory();
        for bad in malformed_tokens() {
            store_token(&store, &bad);
            assert!(
                matches!(store.decode(), Err(SessionError::Malformed(_))),
                "expected Malformed for {bad:?}"
            );
            assert!(store.claims().is_none());
            assert!(!store.is_valid());
            assert!(store.role().is_none());
        }
    }

    #[test]
    fn test_fractional_expiry_is_a_valid_session() {
        let store = CredentialStore::in_memory();
        store_token(
            &store,
            &TestTokenBuilder::new()
                .with_role("ROLE_ADMIN")
                .expires_at_fractional(4_000_000_000.5)
                .build(),
        );

        assert!(store.is_valid());
        assert_eq!(store.role(), Some(Role::Admin));
        assert!(store.is_valid_at(4_000_000_000));
        assert!(!store.is_valid_at(4_000_000_001));
    }

    #[test]
    fn test_token_without_expiry_keeps_identity_but_is_invalid() {
        let store = CredentialStore::in_memory();
        store_token(
            &store,
            &TestTokenBuilder::new()
                .for_user("prof.smith")
                .with_role("ROLE_PROFESSOR")
                .without_expiry()
                .build(),
        );

        assert!(!store.is_valid());
        assert_eq!(store.role(), Some(Role::Professor));
        assert_eq!(store.subject().as_deref(), Some("prof.smith"));
        assert!(!store.session().unwrap().valid);
    }

    #[test]
    fn test_unrecognized_role_is_preserved() {
        let store = CredentialStore::in_memory();
        store_token(&store, &TestTokenBuilder::new().with_role("ROLE_USER").build());
        assert_eq!(store.role(), Some(Role::Other("ROLE_USER".to_string())));
    }

    #[test]
    fn test_clear_removes_token() {
        let store = CredentialStore::in_memory();
        store_token(&store, &TestTokenBuilder::new().build());
        assert!(store.is_valid());

        store.clear().unwrap();
        assert!(store.read().unwrap().is_none());
        assert!(!store.is_valid());

        // Clearing twice is harmless.
        store.clear().unwrap();
    }

    #[test]
    fn test_handles_over_shared_storage_observe_each_other() {
        let shared: Arc<dyn TokenStorage> = Arc::new(MemoryStorage::new());
        let tab_a = CredentialStore::new(Arc::clone(&shared));
        let tab_b = CredentialStore::new(shared);

        store_token(&tab_a, &TestTokenBuilder::new().build());
        assert!(tab_b.is_valid());

        tab_a.clear().unwrap();
        assert!(!tab_b.is_valid());
    }

    #[test]
    fn test_debug_redacts_token() {
        let store = CredentialStore::in_memory();
        let token = TestTokenBuilder::new().build();
        store_token(&store, &token);

        let debug = format!("{store:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(&token));
    }
}
