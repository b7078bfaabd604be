//! Logout.

use crate::routing::{Navigator, LOGIN_PATH};
use crate::session::{CredentialStore, StorageError};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Ends the current session.
pub struct SessionController {
    store: CredentialStore,
    navigator: Arc<dyn Navigator>,
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl SessionController {
    pub fn new(store: CredentialStore, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    /// Clear the stored token and go to the login page.
    ///
    /// Navigation happens even when clearing fails, so the user is never
    /// left on a protected page.
    ///
    /// # Errors
    ///
    /// Returns the storage failure from clearing the token.
    pub fn logout(&self) -> Result<(), StorageError> {
        let cleared = self.store.clear();
        info!(
            target: "campus.session.store",
            cleared = cleared.is_ok(),
            "Logged out"
        );
        self.navigator.navigate(LOGIN_PATH);
        cleared
    }
}
