//! Fixed test identities
//!
//! Logins, roles and passwords used across tests so fixtures line up.

// Authorities, as carried in the `auth` claim
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
pub const ROLE_PROFESSOR: &str = "ROLE_PROFESSOR";
pub const ROLE_UNKNOWN: &str = "ROLE_USER";

// Logins
pub const TEST_ADMIN_LOGIN: &str = "admin";
pub const TEST_PROFESSOR_LOGIN: &str = "prof.durand";

// Passwords
pub const TEST_PASSWORD: &str = "test-password-do-not-use-in-production";

// Signing secret for HS256 fixtures
pub const TEST_SIGNING_SECRET: &[u8] = b"campus-test-signing-secret-0123456789";
