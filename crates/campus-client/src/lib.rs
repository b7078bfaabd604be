//! Campus Admin Client Library
//!
//! Session and authorization core of the Campus Admin school management
//! client, plus typed access to its REST backend:
//!
//! - Credential storage and lazy claim decoding
//! - Login against `POST /authenticate`
//! - Bearer token injection on every outbound API call
//! - Route admission and the application route table
//! - Role-derived menu and dashboard composition
//!
//! # Architecture
//!
//! ```text
//! auth/ -> session/ <- http/ <- api/, views/
//!             ^
//!          routing/
//! ```
//!
//! One [`session::CredentialStore`] is built over a
//! [`session::TokenStorage`] and handed to every consumer; there is no
//! global session.
//!
//! # Modules
//!
//! - `api` - CRUD clients per entity
//! - `auth` - Login client, login form, logout
//! - `config` - Client configuration from environment
//! - `errors` - API error types and body sanitization
//! - `http` - Shared HTTP client and request interceptors
//! - `models` - Wire types
//! - `routing` - Admission guard, navigator, route table
//! - `session` - Token storage and credential store
//! - `views` - Menu, dashboard and view scopes

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod http;
pub mod models;
pub mod routing;
pub mod session;
pub mod views;
