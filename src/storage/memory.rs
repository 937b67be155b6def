use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{BlobStore, StoreError};

/// In-process store. Can be built to fail every call.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose reads and writes always return `StoreError::Unavailable`.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Pre-populate a key, bypassing the write counter.
    pub fn with_blob(self, key: &str, value: &str) -> Self {
        self.blobs.lock().insert(key.to_string(), value.to_string());
        self
    }

    /// Number of successful `set` calls.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.failing {
            return Err(StoreError::Unavailable("memory store set to fail".into()));
        }
        Ok(self.blobs.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.failing {
            return Err(StoreError::Unavailable("memory store set to fail".into()));
        }
        self.blobs.lock().insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
