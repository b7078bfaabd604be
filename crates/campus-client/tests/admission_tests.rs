//! Route admission integration tests.
//!
//! Exercises the router over file-backed storage shared between handles.

// Test code is allowed to use expect/unwrap for assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use campus_client::routing::{
    FeatureArea, HistoryNavigator, Navigation, Page, Router, View, LOGIN_PATH, NOT_FOUND_PATH,
};
use campus_client::session::{CredentialStore, FileStorage};
use campus_test_utils::{TestTokenBuilder, ROLE_PROFESSOR};
use common::secret::SecretString;
use std::cell::Cell;
use std::sync::Arc;
use tempfile::TempDir;

fn file_store(dir: &TempDir) -> CredentialStore {
    CredentialStore::new(Arc::new(FileStorage::new(dir.path())))
}

fn router_over(store: &CredentialStore, enforce: bool) -> (Router, HistoryNavigator) {
    let navigator = HistoryNavigator::new();
    let router = Router::new(store.clone(), Arc::new(navigator.clone()), enforce);
    (router, navigator)
}

#[test]
fn test_guarded_route_without_token_never_builds_view() {
    let dir = TempDir::new().unwrap();
    let (router, navigator) = router_over(&file_store(&dir), false);
    let built = Cell::new(false);

    let nav = router.navigate("/students/list", |view| {
        built.set(true);
        view
    });

    assert!(!built.get());
    assert_eq!(
        nav,
        Navigation::Redirected {
            to: LOGIN_PATH.to_string()
        }
    );
    assert_eq!(navigator.current().as_deref(), Some(LOGIN_PATH));
}

#[test]
fn test_clearing_in_one_handle_fails_the_other() {
    let dir = TempDir::new().unwrap();
    let tab_a = file_store(&dir);
    let tab_b = file_store(&dir);
    tab_a
        .store(&SecretString::from(TestTokenBuilder::new().build()))
        .unwrap();

    let (router_b, navigator_b) = router_over(&tab_b, false);
    assert!(router_b.navigate("/", |v| v).is_mounted());

    tab_a.clear().unwrap();

    let nav = router_b.navigate("/groups/list", |v| v);
    assert!(!nav.is_mounted());
    assert_eq!(navigator_b.current().as_deref(), Some(LOGIN_PATH));
}

#[test]
fn test_token_survives_a_new_handle() {
    let dir = TempDir::new().unwrap();
    file_store(&dir)
        .store(&SecretString::from(TestTokenBuilder::new().build()))
        .unwrap();

    let reopened = file_store(&dir);
    assert!(reopened.is_valid());
}

#[test]
fn test_expired_token_is_redirected() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    store
        .store(&SecretString::from(TestTokenBuilder::new().expired().build()))
        .unwrap();

    let (router, navigator) = router_over(&store, false);
    assert!(!router.navigate("/payments/list", |v| v).is_mounted());
    assert_eq!(navigator.history(), vec![LOGIN_PATH.to_string()]);
}

#[test]
fn test_public_and_unknown_routes() {
    let dir = TempDir::new().unwrap();
    let (router, _) = router_over(&file_store(&dir), false);

    assert!(router.navigate(LOGIN_PATH, |v| v).is_mounted());
    let nav = router.navigate("/no/such/place", |v| v);
    assert_eq!(nav.view(), Some(&View::NotFound));
    assert!(matches!(nav, Navigation::Mounted { ref path, .. } if path == NOT_FOUND_PATH));
}

#[test]
fn test_role_gating_when_enforced() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    store
        .store(&SecretString::from(
            TestTokenBuilder::new().with_role(ROLE_PROFESSOR).build(),
        ))
        .unwrap();

    let (lenient, _) = router_over(&store, false);
    assert!(lenient.navigate("/students/list", |v| v).is_mounted());

    let (strict, navigator) = router_over(&store, true);
    assert!(!strict.navigate("/students/list", |v| v).is_mounted());
    assert_eq!(navigator.current().as_deref(), Some("/"));

    let nav = strict.navigate("/groups", |v| v);
    assert_eq!(
        nav.view(),
        Some(&View::Feature {
            area: FeatureArea::Groups,
            page: Page::List
        })
    );
}
