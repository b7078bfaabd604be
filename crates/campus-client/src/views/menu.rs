//! Navigation menu composed from the session role.

use crate::session::CredentialStore;
use common::types::Role;
use serde::Serialize;
use tracing::debug;

/// One clickable menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub label: &'static str,
    pub icon: &'static str,
    pub router_link: &'static str,
}

/// Titled group of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuSection {
    pub label: &'static str,
    pub items: Vec<MenuItem>,
}

/// Full menu, in display order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Menu {
    pub sections: Vec<MenuSection>,
}

impl Menu {
    /// Every router link in display order.
    #[must_use]
    pub fn links(&self) -> Vec<&'static str> {
        self.sections
            .iter()
            .flat_map(|s| s.items.iter().map(|i| i.router_link))
            .collect()
    }
}

const fn item(label: &'static str, icon: &'static str, router_link: &'static str) -> MenuItem {
    MenuItem {
        label,
        icon,
        router_link,
    }
}

fn home() -> MenuSection {
    MenuSection {
        label: "Home",
        items: vec![item("Dashboard", "pi pi-home", "/")],
    }
}

fn groups() -> MenuSection {
    MenuSection {
        label: "Groups",
        items: vec![item("Groups", "pi pi-clone", "/groups/list")],
    }
}

fn admin_sections() -> Vec<MenuSection> {
    vec![
        home(),
        MenuSection {
            label: "Professors",
            items: vec![
                item("Professors", "pi pi-users", "/profs/list"),
                item("Add Professor", "pi pi-user-plus", "/profs/add"),
            ],
        },
        MenuSection {
            label: "Students",
            items: vec![
                item("List Students", "pi pi-users", "/students/list"),
                item("Add Student", "pi pi-user-plus", "/students/add"),
            ],
        },
        MenuSection {
            label: "Payments",
            items: vec![
                item("Payment List", "pi pi-credit-card", "/payments/list"),
                item("Make Payment", "pi pi-dollar", "/payments/add"),
            ],
        },
        groups(),
        MenuSection {
            label: "Subjects",
            items: vec![
                item("Subjects", "pi pi-clone", "/subjects/list"),
                item("Add Subject", "pi pi-clone", "/subjects/add"),
            ],
        },
    ]
}

/// Menu for `role`. Unknown or absent roles get the home entry only.
#[must_use]
pub fn compose_menu(role: Option<&Role>) -> Menu {
    let sections = match role {
        Some(Role::Admin) => admin_sections(),
        Some(Role::Professor) => vec![home(), groups()],
        Some(Role::Other(_)) | None => vec![home()],
    };
    Menu { sections }
}

/// Menu view holding the role snapshot taken when it was built.
///
/// A later login or logout does not change an existing view; build a new
/// one to pick up the new role.
#[derive(Debug, Clone)]
pub struct MenuView {
    role: Option<Role>,
    menu: Menu,
}

impl MenuView {
    #[must_use]
    pub fn build(store: &CredentialStore) -> Self {
        let role = store.role();
        let menu = compose_menu(role.as_ref());
        debug!(
            target: "campus.views.menu",
            role = role.as_ref().map_or("none", Role::as_authority),
            sections = menu.sections.len(),
            "Menu composed"
        );
        Self { role, menu }
    }

    #[must_use]
    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    #[must_use]
    pub fn menu(&self) -> &Menu {
        &self.menu
    }
}
