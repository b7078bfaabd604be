//! Navigation, route table and admission.

pub mod admission;
pub mod navigator;
pub mod router;

pub use admission::{AuthGuard, LOGIN_PATH};
pub use navigator::{HistoryNavigator, Navigator};
pub use router::{
    resolve, AuthPage, FeatureArea, Navigation, Page, Route, Router, View, HOME_PATH,
    NOT_FOUND_PATH,
};
