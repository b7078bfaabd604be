//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports types from the [`secrecy`] crate. Use them for login passwords
//! and bearer tokens: anything that derives `Debug` over a `SecretString`
//! prints `[REDACTED]` instead of the value, and the value is zeroized on drop.
//!
//! # Example
//!
//! ```rust
//! use common::secret::SecretString;
//! use secrecy::ExposeSecret;
//!
//! #[derive(Debug)]
//! struct Credentials {
//!     username: String,
//!     password: SecretString,
//! }
//!
//! let creds = Credentials {
//!     username: "admin".to_string(),
//!     password: SecretString::from("admin"),
//! };
//!
//! assert!(format!("{creds:?}").contains("REDACTED"));
//! let password: &str = creds.password.expose_secret();
//! assert_eq!(password, "admin");
//! ```

pub use secrecy::{ExposeSecret, SecretString};

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SecretString::from("eyJhbGciOiJIUzUxMiJ9.e30.sig");
        let debug_str = format!("{secret:?}");

        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("eyJhbGci"));
    }

    #[test]
    fn test_expose_secret_returns_inner_value() {
        let secret = SecretString::from("password123");
        assert_eq!(secret.expose_secret(), "password123");
    }

    #[test]
    fn test_deserialize_keeps_value_hidden() {
        #[allow(dead_code)]
        #[derive(Debug, Deserialize)]
        struct LoginBody {
            username: String,
            password: SecretString,
        }

        let json = r#"{"username": "prof", "password": "my-secret-value"}"#;
        let body: LoginBody = serde_json::from_str(json).expect("deserialize");

        assert_eq!(body.password.expose_secret(), "my-secret-value");
        let debug = format!("{body:?}");
        assert!(!debug.contains("my-secret-value"));
        assert!(debug.contains("prof"));
    }

    #[test]
    fn test_clone_works() {
        let secret = SecretString::from("cloneable");
        let cloned = secret.clone();
        assert_eq!(cloned.expose_secret(), "cloneable");
    }
}
