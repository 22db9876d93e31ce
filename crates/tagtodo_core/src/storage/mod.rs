//! Durable key-value storage contract and implementations.
//!
//! # Responsibility
//! - Define the storage collaborator consumed by the task and theme stores.
//! - Keep SQL and in-memory details behind one string-keyed interface.
//!
//! # Invariants
//! - A missing key is `Ok(None)`, never an error.
//! - `set_item` replaces the whole value for a key.
//! - Implementations are `Send + Sync` so writes can run on blocking threads.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Storage key holding the serialized task snapshot.
pub const TASKS_KEY: &str = "@todos";
/// Storage key holding the theme preference.
pub const THEME_KEY: &str = "@theme_mode";

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure while reading, writing or decoding a stored value.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Snapshot could not be encoded.
    Serialize(serde_json::Error),
    /// Stored value is not a valid snapshot.
    Deserialize(serde_json::Error),
    /// Backend refused the operation (e.g. simulated outage).
    Unavailable(String),
    /// A lock guarding the backend was poisoned by a panicking writer.
    Poisoned,
    /// Background I/O task panicked or was cancelled.
    Join(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to encode stored value: {err}"),
            Self::Deserialize(err) => write!(f, "stored value is corrupt: {err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
            Self::Poisoned => write!(f, "storage lock poisoned"),
            Self::Join(message) => write!(f, "storage task failed: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) | Self::Deserialize(err) => Some(err),
            Self::Unavailable(_) | Self::Poisoned | Self::Join(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String-keyed durable storage used by the stores.
pub trait KeyValueStorage: Send + Sync + 'static {
    /// Reads the value for `key`; `Ok(None)` when the key was never written.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    /// Writes `value` for `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Deletes `key`; deleting a missing key succeeds.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}
