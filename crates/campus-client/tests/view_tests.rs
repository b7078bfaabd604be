//! Role-derived view integration tests.
//!
//! Menu composition and dashboard loading per role, and teardown of views
//! with requests still in flight.

// Test code is allowed to use expect/unwrap for assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use campus_client::config::ClientConfig;
use campus_client::http::ApiClient;
use campus_client::routing::{resolve, Route};
use campus_client::session::CredentialStore;
use campus_client::views::{
    DashboardData, DashboardLoader, DashboardVariant, DashboardView, MenuView,
};
use campus_test_utils::{
    malformed_tokens, MockBackend, TestTokenBuilder, ROLE_ADMIN, ROLE_PROFESSOR, ROLE_UNKNOWN,
    TEST_PROFESSOR_LOGIN,
};
use common::secret::SecretString;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn store_with(token: &str) -> CredentialStore {
    let store = CredentialStore::in_memory();
    store.store(&SecretString::from(token)).unwrap();
    store
}

fn loader(backend: &MockBackend, store: &CredentialStore) -> DashboardLoader {
    let config = ClientConfig::for_base_url(&backend.api_base_url()).unwrap();
    DashboardLoader::new(ApiClient::new(&config, store.clone()).unwrap())
}

#[test]
fn test_menu_per_role_is_never_empty() {
    let cases = [
        (Some(ROLE_ADMIN), 6),
        (Some(ROLE_PROFESSOR), 2),
        (Some(ROLE_UNKNOWN), 1),
        (None, 1),
    ];

    for (role, sections) in cases {
        let store = match role {
            Some(role) => store_with(&TestTokenBuilder::new().with_role(role).build()),
            None => CredentialStore::in_memory(),
        };
        let view = MenuView::build(&store);
        assert_eq!(view.menu().sections.len(), sections, "role {role:?}");
        assert!(!view.menu().links().is_empty());
    }
}

#[test]
fn test_malformed_token_gets_minimal_menu() {
    for bad in malformed_tokens() {
        let view = MenuView::build(&store_with(&bad));
        assert!(view.role().is_none());
        assert_eq!(view.menu().links(), vec!["/"]);
    }
}

#[test]
fn test_every_menu_link_resolves_to_a_page() {
    let store = store_with(&TestTokenBuilder::new().with_role(ROLE_ADMIN).build());
    for link in MenuView::build(&store).menu().links() {
        assert!(
            matches!(resolve(link), Route::Root | Route::Feature { .. }),
            "{link} does not resolve to a page"
        );
    }
}

#[test]
fn test_menu_is_a_snapshot() {
    let store = store_with(&TestTokenBuilder::new().with_role(ROLE_ADMIN).build());
    let view = MenuView::build(&store);
    store.clear().unwrap();
    assert_eq!(view.menu().sections.len(), 6);
    assert_eq!(MenuView::build(&store).menu().sections.len(), 1);
}

#[tokio::test]
async fn test_professor_dashboard_uses_session_subject() {
    let backend = MockBackend::start().await;
    backend
        .mock_get_json(
            &format!("dashboard/professors/{TEST_PROFESSOR_LOGIN}"),
            json!({"totalStudents": 31, "subjectDistribution": {"Algebra": 2}}),
        )
        .await;

    let store = store_with(
        &TestTokenBuilder::new()
            .for_user(TEST_PROFESSOR_LOGIN)
            .with_role(ROLE_PROFESSOR)
            .build(),
    );
    let mut view = DashboardView::open(&store, loader(&backend, &store));
    assert!(view.settled().await);

    match view.state().data {
        Some(DashboardData::Professor(stats)) => assert_eq!(stats.total_students, 31),
        other => unreachable!("unexpected dashboard data: {other:?}"),
    }
    assert!(backend
        .authorization_headers()
        .await
        .iter()
        .all(Option::is_some));
}

#[tokio::test]
async fn test_professor_without_subject_fetches_nothing() {
    let backend = MockBackend::start().await;
    let store = store_with(
        &TestTokenBuilder::new()
            .without_subject()
            .with_role(ROLE_PROFESSOR)
            .build(),
    );

    let mut view = DashboardView::open(&store, loader(&backend, &store));
    assert!(matches!(
        view.variant(),
        DashboardVariant::Unavailable { .. }
    ));
    assert!(!view.settled().await);
    assert!(backend.requests().await.is_empty());
}

#[tokio::test]
async fn test_late_dashboard_completion_after_teardown_is_discarded() {
    let backend = MockBackend::start().await;
    Mock::given(method("GET"))
        .and(path(MockBackend::api_path("dashboard")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"totalStudents": 5}))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(backend.server())
        .await;

    let store = store_with(&TestTokenBuilder::new().with_role(ROLE_ADMIN).build());
    let mut view = DashboardView::open(&store, loader(&backend, &store));
    tokio::time::sleep(Duration::from_millis(20)).await;
    view.teardown();

    assert!(!view.settled().await);
    assert!(view.state().data.is_none());
}
