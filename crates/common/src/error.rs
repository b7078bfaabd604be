//! Common error types for Campus Admin components.

use thiserror::Error;

/// Errors surfaced to the user of any Campus Admin front end.
///
/// Component-level errors convert into this type at the edge so every
/// command reports failures through one vocabulary.
#[derive(Error, Debug)]
pub enum CampusError {
    /// Network transport error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Token storage failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// No valid session, or the backend refused the credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Backend rejected the request
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using `CampusError`
pub type Result<T> = std::result::Result<T, CampusError>;
