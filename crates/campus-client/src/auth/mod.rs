//! Login, logout and the login form.

pub mod client;
pub mod login_form;
pub mod session_controller;

pub use client::{AuthClient, FieldError, LoginError, LoginRequest, AUTHENTICATE_PATH};
pub use login_form::{
    BannerMessage, LoginController, LoginForm, LoginFormState, Severity, SubmitOutcome,
};
pub use session_controller::SessionController;
