//! Route table and navigation.
//!
//! ```text
//! /                         dashboard           protected
//! /students/{list,add,edit/:id}                 protected, feature area
//! /groups/{list,update}                         protected, feature area
//! /profs/{list,add}                             protected, feature area
//! /payments/{list,add}                          protected, feature area
//! /subjects/{list,add}                          protected, feature area
//! /admins/{list,add,edit/:login}                protected, feature area
//! /auth/{login,error,access}                    public
//! /pages/notfound                               public
//! anything else             -> /pages/notfound
//! ```
//!
//! A feature area's bare path redirects to its list page. Views are built by
//! a caller-supplied closure that only runs once admission succeeds.

use crate::routing::admission::{AuthGuard, LOGIN_PATH};
use crate::routing::navigator::Navigator;
use crate::session::CredentialStore;
use common::types::Role;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Not-found page, the target of every unmatched location.
pub const NOT_FOUND_PATH: &str = "/pages/notfound";

/// Root of the protected tree.
pub const HOME_PATH: &str = "/";

/// Upper bound on static redirects followed during one navigation.
const MAX_REDIRECTS: usize = 4;

/// Lazily loaded feature area under the protected root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureArea {
    Students,
    Groups,
    Professors,
    Payments,
    Subjects,
    Admins,
}

impl FeatureArea {
    pub const ALL: [FeatureArea; 6] = [
        FeatureArea::Students,
        FeatureArea::Groups,
        FeatureArea::Professors,
        FeatureArea::Payments,
        FeatureArea::Subjects,
        FeatureArea::Admins,
    ];

    /// First path segment of the area.
    #[must_use]
    pub fn segment(self) -> &'static str {
        match self {
            FeatureArea::Students => "students",
            FeatureArea::Groups => "groups",
            FeatureArea::Professors => "profs",
            FeatureArea::Payments => "payments",
            FeatureArea::Subjects => "subjects",
            FeatureArea::Admins => "admins",
        }
    }

    #[must_use]
    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.segment() == segment)
    }

    /// Roles admitted when role gating is enabled.
    #[must_use]
    pub fn allowed_roles(self) -> &'static [Role] {
        const ADMIN_ONLY: &[Role] = &[Role::Admin];
        const STAFF: &[Role] = &[Role::Admin, Role::Professor];
        match self {
            FeatureArea::Groups => STAFF,
            _ => ADMIN_ONLY,
        }
    }

    fn page(self, rest: &[&str]) -> Option<Page> {
        match (self, rest) {
            (_, ["list"]) => Some(Page::List),
            (FeatureArea::Groups, ["update"]) => Some(Page::Update),
            (FeatureArea::Groups, _) => None,
            (_, ["add"]) => Some(Page::Add),
            (FeatureArea::Students | FeatureArea::Admins, ["edit", key]) if !key.is_empty() => {
                Some(Page::Edit {
                    key: (*key).to_string(),
                })
            }
            _ => None,
        }
    }
}

/// Page within a feature area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    List,
    Add,
    Update,
    /// Edit form for the entity identified by `key` (id or login).
    Edit { key: String },
}

/// Public pages under `/auth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPage {
    Login,
    Error,
    Access,
}

/// What a location renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Auth(AuthPage),
    NotFound,
    Feature { area: FeatureArea, page: Page },
}

/// Result of matching a location against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Rendered without admission.
    Public(View),
    /// Protected dashboard root.
    Root,
    /// Protected feature page.
    Feature { area: FeatureArea, page: Page },
    /// Static redirect.
    Redirect(String),
}

/// Outcome of [`Router::navigate`].
#[derive(Debug, PartialEq, Eq)]
pub enum Navigation<V> {
    /// Admission succeeded and the view was built.
    Mounted { path: String, view: V },
    /// Admission failed; the navigator was sent to `to` and no view exists.
    Redirected { to: String },
}

impl<V> Navigation<V> {
    #[must_use]
    pub fn view(&self) -> Option<&V> {
        match self {
            Navigation::Mounted { view, .. } => Some(view),
            Navigation::Redirected { .. } => None,
        }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        matches!(self, Navigation::Mounted { .. })
    }
}

/// Canonical form of a location: leading slash, no query or fragment, no
/// trailing slash, no empty segments.
#[must_use]
pub fn normalize(path: &str) -> String {
    let without_query = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = without_query.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// Match a location against the route table.
#[must_use]
pub fn resolve(path: &str) -> Route {
    let normalized = normalize(path);
    let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        [] => Route::Root,
        ["auth", "login"] => Route::Public(View::Auth(AuthPage::Login)),
        ["auth", "error"] => Route::Public(View::Auth(AuthPage::Error)),
        ["auth", "access"] => Route::Public(View::Auth(AuthPage::Access)),
        ["pages", "notfound"] => Route::Public(View::NotFound),
        [first, rest @ ..] => match FeatureArea::from_segment(first) {
            Some(area) if rest.is_empty() => Route::Redirect(format!("/{}/list", area.segment())),
            Some(area) => match area.page(rest) {
                Some(page) => Route::Feature { area, page },
                None => Route::Redirect(NOT_FOUND_PATH.to_string()),
            },
            None => Route::Redirect(NOT_FOUND_PATH.to_string()),
        },
    }
}

/// Navigates between routes, consulting the guard before any protected view
/// is built.
#[derive(Clone)]
pub struct Router {
    guard: AuthGuard,
    store: CredentialStore,
    navigator: Arc<dyn Navigator>,
    enforce_route_roles: bool,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("guard", &self.guard)
            .field("enforce_route_roles", &self.enforce_route_roles)
            .finish_non_exhaustive()
    }
}

impl Router {
    pub fn new(
        store: CredentialStore,
        navigator: Arc<dyn Navigator>,
        enforce_route_roles: bool,
    ) -> Self {
        Self {
            guard: AuthGuard::new(store.clone(), Arc::clone(&navigator)),
            store,
            navigator,
            enforce_route_roles,
        }
    }

    /// The admission guard used for protected routes.
    #[must_use]
    pub fn guard(&self) -> &AuthGuard {
        &self.guard
    }

    /// Navigate to `path`.
    ///
    /// `mount` builds the view and is called at most once, only after the
    /// target is admitted. Static redirects are followed first.
    pub fn navigate<V>(&self, path: &str, mount: impl FnOnce(View) -> V) -> Navigation<V> {
        let mut current = normalize(path);

        for _ in 0..MAX_REDIRECTS {
            let view = match resolve(&current) {
                Route::Redirect(to) => {
                    debug!(target: "campus.router", from = %current, to = %to, "Following redirect");
                    current = to;
                    continue;
                }
                Route::Public(view) => view,
                Route::Root => {
                    if !self.guard.can_activate(&current) {
                        return Navigation::Redirected {
                            to: LOGIN_PATH.to_string(),
                        };
                    }
                    View::Dashboard
                }
                Route::Feature { area, page } => {
                    let admitted = self.guard.can_activate(&current)
                        && self.guard.can_load(&current)
                        && self.guard.can_activate_child(&current);
                    if !admitted {
                        return Navigation::Redirected {
                            to: LOGIN_PATH.to_string(),
                        };
                    }
                    if !self.role_admits(area) {
                        info!(
                            target: "campus.router.admission",
                            area = area.segment(),
                            "Role not allowed in area, redirecting home"
                        );
                        self.navigator.navigate(HOME_PATH);
                        return Navigation::Redirected {
                            to: HOME_PATH.to_string(),
                        };
                    }
                    View::Feature { area, page }
                }
            };

            return Navigation::Mounted {
                path: current,
                view: mount(view),
            };
        }

        self.navigator.navigate(NOT_FOUND_PATH);
        Navigation::Redirected {
            to: NOT_FOUND_PATH.to_string(),
        }
    }

    fn role_admits(&self, area: FeatureArea) -> bool {
        if !self.enforce_route_roles {
            return true;
        }
        self.store
            .role()
            .is_some_and(|role| area.allowed_roles().contains(&role))
    }
}
