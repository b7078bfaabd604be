//! Role-derived views.

pub mod dashboard;
pub mod menu;
pub mod scope;

pub use dashboard::{
    progress_width, ChartSeries, DashboardData, DashboardLoader, DashboardState, DashboardVariant,
    DashboardView,
};
pub use menu::{compose_menu, Menu, MenuItem, MenuSection, MenuView};
pub use scope::ViewScope;
