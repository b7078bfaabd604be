//! Common utilities and types shared across Campus Admin components.

#![warn(clippy::pedantic)]

/// Module for common data types (roles, authority names)
pub mod types;

/// Module for common error types
pub mod error;

/// Module for common configuration
pub mod config;

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for bearer-token claim decoding (no signature verification)
pub mod jwt;
