//! # Campus Test Utilities
//!
//! Shared test utilities for the Campus Admin client crates.
//!
//! This crate provides:
//! - Token builders (unsigned and HS256-signed compact tokens)
//! - Malformed token fixtures
//! - Fixed test identities
//! - A mock REST backend (`MockBackend`) on top of wiremock
//!
//! ## Usage
//!
//! ```rust,ignore
//! use campus_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let backend = MockBackend::start().await;
//!     let token = TestTokenBuilder::new()
//!         .for_user(TEST_PROFESSOR_LOGIN)
//!         .with_role(ROLE_PROFESSOR)
//!         .build();
//!     backend.mock_login_success(&token).await;
//! }
//! ```

pub mod mock_backend;
pub mod test_ids;
pub mod token_builders;

// Re-export commonly used items
pub use mock_backend::*;
pub use test_ids::*;
pub use token_builders::*;
