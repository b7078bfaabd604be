//! Route admission.
//!
//! Every protected navigation asks the guard first. The check is binary:
//! a decodable, unexpired token admits, anything else sends the user to the
//! login page. Expiry is noticed here, lazily, on the next navigation.

use crate::routing::navigator::Navigator;
use crate::session::CredentialStore;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Login page, the target of every failed admission.
pub const LOGIN_PATH: &str = "/auth/login";

/// Session-validity guard for protected routes.
#[derive(Clone)]
pub struct AuthGuard {
    store: CredentialStore,
    navigator: Arc<dyn Navigator>,
}

impl fmt::Debug for AuthGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGuard")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl AuthGuard {
    pub fn new(store: CredentialStore, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    /// Admit navigation to `target` when the session is valid; otherwise
    /// navigate to [`LOGIN_PATH`] and refuse.
    pub fn can_enter(&self, target: &str) -> bool {
        self.admit(target, self.store.is_valid())
    }

    /// [`Self::can_enter`] evaluated at `now` (Unix epoch seconds).
    pub fn can_enter_at(&self, target: &str, now: i64) -> bool {
        self.admit(target, self.store.is_valid_at(now))
    }

    fn admit(&self, target: &str, valid: bool) -> bool {
        if valid {
            debug!(target: "campus.router.admission", path = %target, "Navigation admitted");
            return true;
        }

        info!(
            target: "campus.router.admission",
            path = %target,
            "No valid session, redirecting to login"
        );
        self.navigator.navigate(LOGIN_PATH);
        false
    }

    /// Guard for activating a protected route.
    pub fn can_activate(&self, target: &str) -> bool {
        self.can_enter(target)
    }

    /// Guard for activating a child of a protected route.
    pub fn can_activate_child(&self, target: &str) -> bool {
        self.can_enter(target)
    }

    /// Guard for loading a feature area.
    pub fn can_load(&self, target: &str) -> bool {
        self.can_enter(target)
    }
}
