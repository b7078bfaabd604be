//! Navigation sink.
//!
//! Guards and controllers never change location themselves; they ask an
//! injected [`Navigator`] to do it. The CLI and the tests use
//! [`HistoryNavigator`], which records every requested location.

use std::sync::{Arc, Mutex, PoisonError};

/// Something that can move the user to another location.
pub trait Navigator: Send + Sync {
    /// Request navigation to `path`.
    fn navigate(&self, path: &str);
}

impl<N: Navigator + ?Sized> Navigator for Arc<N> {
    fn navigate(&self, path: &str) {
        (**self).navigate(path);
    }
}

/// Navigator that records requested locations in order.
///
/// Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct HistoryNavigator {
    history: Arc<Mutex<Vec<String>>>,
}

impl HistoryNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently requested location.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.lock().last().cloned()
    }

    /// Every requested location, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, path: &str) {
        tracing::debug!(target: "campus.router", path = %path, "Navigating");
        self.lock().push(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_records_in_order() {
        let nav = HistoryNavigator::new();
        assert_eq!(nav.current(), None);

        nav.navigate("/auth/login");
        nav.navigate("/");
        assert_eq!(nav.current().as_deref(), Some("/"));
        assert_eq!(nav.history(), vec!["/auth/login".to_string(), "/".to_string()]);
    }

    #[test]
    fn test_shared_through_arc_and_clone() {
        let nav = HistoryNavigator::new();
        let as_dyn: Arc<dyn Navigator> = Arc::new(nav.clone());
        as_dyn.navigate("/pages/notfound");
        assert_eq!(nav.current().as_deref(), Some("/pages/notfound"));
    }
}
