//! Key-value store boundary.

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

/// Errors from the key-value transport.
#[derive(Debug, Error)]
pub enum KvError {
    /// The store could not be reached or refused the operation.
    #[error("key-value store unavailable: {0}")]
    Unavailable(String),
}

/// String-keyed, string-valued store with per-key atomic get/set.
///
/// No TTL semantics are assumed here; expiry, if wanted, belongs to the
/// backing service's configuration.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the value under `key`, or `None` if the key was never set.
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Replaces the value under `key`. A concurrent `get` observes either
    /// the previous value or the new one, never a mix.
    async fn set(&self, key: &str, value: String) -> Result<(), KvError>;
}

/// In-process [`KvStore`] backed by a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: DashMap<String, String>,
}

impl MemoryKv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), KvError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}
