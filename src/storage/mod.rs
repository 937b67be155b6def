//! Key-value blob persistence used for session history.
//!
//! The session only needs `get`/`set` of whole string blobs under a fixed key,
//! so any durable string store satisfies the contract. Two backends ship:
//!
//! - [`memory::MemoryStore`]: process-local map, used by tests and `--ephemeral` runs.
//! - [`file::FileStore`]: one JSON file per key under the data directory.

pub mod file;
pub mod memory;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error for key `{key}`: {source}")]
    Io {
        key: String,
        source: std::io::Error,
    },

    #[error("invalid store key `{0}`")]
    InvalidKey(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable string store keyed by name.
pub trait BlobStore: Send + Sync {
    /// Read the blob under `key`; `Ok(None)` when nothing was stored.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the blob under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
