//! Session token persistence and decoding.

pub mod credential_store;
pub mod storage;

pub use credential_store::{CredentialStore, Session, SessionError, TOKEN_KEY};
pub use storage::{FileStorage, MemoryStorage, StorageError, TokenStorage};
