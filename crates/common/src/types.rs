//! Common data types for Campus Admin components.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Authority string carried by administrator sessions.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Authority string carried by professor sessions.
pub const ROLE_PROFESSOR: &str = "ROLE_PROFESSOR";

/// Role derived from the `auth` claim of a session token.
///
/// The backend issues exactly one authority per token. Anything outside the
/// recognized pair is kept verbatim in [`Role::Other`] so callers can log it,
/// but it never grants more than the default view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// `ROLE_ADMIN`: full entity management and aggregate dashboard.
    Admin,
    /// `ROLE_PROFESSOR`: groups and a personal dashboard.
    Professor,
    /// Any other authority value.
    Other(String),
}

impl Role {
    /// Map a raw authority claim to a role. Matching is exact.
    #[must_use]
    pub fn from_claim(authority: &str) -> Self {
        match authority {
            ROLE_ADMIN => Role::Admin,
            ROLE_PROFESSOR => Role::Professor,
            other => Role::Other(other.to_string()),
        }
    }

    /// The authority string as it appears on the wire.
    #[must_use]
    pub fn as_authority(&self) -> &str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Professor => ROLE_PROFESSOR,
            Role::Other(s) => s,
        }
    }

    /// Whether this role is one of the recognized roles.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Role::Other(_))
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::from_claim(&value)
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_authority().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_authority())
    }
}
